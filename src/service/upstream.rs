//! 上游链调用的统一抽象
//!
//! 两条链的客户端都实现这里的 trait，所有失败统一归类为 [`UpstreamError`]，
//! 由 API 层转换为固定的对外错误。每次上游调用都必须经过 [`with_deadline`]。

use std::{
    future::Future,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Pubkey, RawUserData, TokenAccount, UiTokenAmount};

/// 上游调用失败分类
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("contract call failed: {0}")]
    Contract(String),
    #[error("no token account found for owner {owner}")]
    NoTokenAccount { owner: String },
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl UpstreamError {
    /// 日志/指标使用的分类标签
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) => "invalid_address",
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Rpc { .. } => "rpc",
            Self::Contract(_) => "contract",
            Self::NoTokenAccount { .. } => "no_token_account",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// EVM 质押合约只读句柄
#[async_trait]
pub trait StakingReader: Send + Sync {
    /// 读取 `userData(address)`，地址原样透传给合约调用
    async fn user_data(&self, address: &str) -> UpstreamResult<RawUserData>;
}

/// 非 EVM 链（Solana）代币账本句柄
#[async_trait]
pub trait TokenLedger: Send + Sync {
    async fn token_supply(&self, mint: &Pubkey) -> UpstreamResult<UiTokenAmount>;

    /// 按上游返回顺序列出 owner 名下指定 mint 的代币账户
    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> UpstreamResult<Vec<TokenAccount>>;

    async fn token_account_balance(&self, account: &Pubkey) -> UpstreamResult<UiTokenAmount>;
}

/// 为单次上游调用加截止时间，超时视为上游失败
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> UpstreamResult<T>
where
    F: Future<Output = UpstreamResult<T>>,
{
    let start = Instant::now();
    let result = match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(deadline)),
    };
    crate::metrics::observe_upstream_latency_ms(start.elapsed().as_millis(), result.is_ok());
    result
}
