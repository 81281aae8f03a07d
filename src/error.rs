use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::service::upstream::UpstreamError;

/// 启动期配置错误：进程直接退出，不进入监听
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    Missing(&'static str),
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file as TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 对外查询类型，每种查询有固定的失败文案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    StakingInfo,
    TokenSupply,
    TokenBalance,
}

impl Query {
    pub fn failure_message(self) -> &'static str {
        match self {
            Query::StakingInfo => "Error getting staking info",
            Query::TokenSupply => "Error getting token supply",
            Query::TokenBalance => "Failed to fetch token balance",
        }
    }

    /// 指标中的端点标签
    pub fn endpoint(self) -> &'static str {
        match self {
            Query::StakingInfo => "GET /staking-info/:address",
            Query::TokenSupply => "GET /solana/token-supply",
            Query::TokenBalance => "GET /solana/token-balance/:address",
        }
    }
}

/// 请求级错误
///
/// 上游错误细节只写日志，响应体只包含固定文案。
/// 所有上游失败目前都映射为 500（包括地址格式错误），分类保留在日志的 `kind` 字段中。
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub query: Query,
    pub status: StatusCode,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl GatewayError {
    pub fn upstream(query: Query, err: UpstreamError) -> Self {
        tracing::error!(
            endpoint = query.endpoint(),
            kind = err.kind(),
            error = %err,
            "{}",
            query.failure_message()
        );
        crate::metrics::count_err(query.endpoint());

        Self {
            query,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.query.failure_message(),
        };
        (self.status, Json(body)).into_response()
    }
}
