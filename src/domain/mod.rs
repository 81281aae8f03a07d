//! Domain 模块
//!
//! 两条链的查询结果模型，以及统一后的对外响应结构

pub mod pubkey;
pub mod staking;
pub mod token;

// 重新导出常用类型
pub use pubkey::{ParsePubkeyError, Pubkey};
pub use staking::{RawUserData, StakingPosition};
pub use token::{TokenAccount, TokenBalance, TokenSupply, UiTokenAmount};
