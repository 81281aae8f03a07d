//! 质押合约查询模型

use ethers::{types::U256, utils::ConversionError};
use serde::Serialize;

use crate::utils::format_ether;

/// 合约 `userData(address)` 返回的原始记录（单位 wei）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawUserData {
    pub total_staked: U256,
    pub unclaimed_rewards: U256,
}

/// 对外返回的质押信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingPosition {
    /// 调用方传入的地址，原样回显
    pub address: String,
    pub staking_balance: String,
    pub accumulated_rewards: String,
}

impl StakingPosition {
    pub fn from_raw(address: impl Into<String>, raw: &RawUserData) -> Result<Self, ConversionError> {
        Ok(Self {
            address: address.into(),
            staking_balance: format_ether(raw.total_staked)?,
            accumulated_rewards: format_ether(raw.unclaimed_rewards)?,
        })
    }
}
