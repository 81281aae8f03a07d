//! ChainLens - 多链只读查询网关
//!
//! 对外暴露 EVM 质押合约与 Solana SPL 代币的只读 HTTP 查询接口

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod metrics;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::{ConfigError, GatewayError, Query};

pub mod prelude {
    pub use crate::{
        app_state::AppState,
        config::Config,
        domain::{Pubkey, StakingPosition, TokenBalance, TokenSupply},
        error::{ConfigError, GatewayError},
        service::{StakingReader, TokenLedger, UpstreamError},
    };
}
