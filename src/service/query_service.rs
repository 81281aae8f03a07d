//! 跨链查询归一化
//!
//! 每个查询只读取注册表中的一个绑定，将链上原始表示换算为统一响应结构；
//! 失败统一返回 [`UpstreamError`]，由 API 层映射为固定错误文案。

use crate::{
    app_state::AppState,
    domain::{Pubkey, StakingPosition, TokenBalance, TokenSupply},
    service::upstream::{with_deadline, UpstreamError, UpstreamResult},
};

/// EVM：地址的质押余额与累计奖励
pub async fn staking_position(state: &AppState, address: &str) -> UpstreamResult<StakingPosition> {
    let raw = with_deadline(state.upstream_timeout, state.staking.user_data(address)).await?;

    StakingPosition::from_raw(address, &raw)
        .map_err(|e| UpstreamError::MalformedResponse(format!("unit conversion: {}", e)))
}

/// Solana：启动时解析的代币 mint 的总供应量
pub async fn token_supply(state: &AppState) -> UpstreamResult<TokenSupply> {
    let supply = with_deadline(
        state.upstream_timeout,
        state.ledger.token_supply(&state.token_mint),
    )
    .await?;

    let total_supply = supply.ui_value().ok_or_else(|| {
        UpstreamError::MalformedResponse(format!(
            "token supply for {} has no ui amount",
            state.token_mint
        ))
    })?;

    Ok(TokenSupply { total_supply })
}

/// Solana：地址持有的代币余额
///
/// 只读取上游返回的第一个代币账户，不对多个账户求和。
pub async fn token_balance(state: &AppState, address: &str) -> UpstreamResult<TokenBalance> {
    let owner: Pubkey = address
        .parse()
        .map_err(|e| UpstreamError::InvalidAddress(format!("{}: {}", address, e)))?;

    let accounts = with_deadline(
        state.upstream_timeout,
        state
            .ledger
            .token_accounts_by_owner(&owner, &state.token_mint),
    )
    .await?;

    let first = accounts.first().ok_or_else(|| UpstreamError::NoTokenAccount {
        owner: owner.to_string(),
    })?;

    let balance = with_deadline(
        state.upstream_timeout,
        state.ledger.token_account_balance(&first.pubkey),
    )
    .await?;

    Ok(TokenBalance {
        address: address.to_string(),
        balance: balance.ui_value(),
    })
}
