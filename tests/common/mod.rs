//! 测试辅助模块
//! 提供链句柄替身和应用状态构建函数

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chainlens::{
    app_state::AppState,
    domain::{Pubkey, RawUserData, TokenAccount, UiTokenAmount},
    service::{StakingReader, TokenLedger, UpstreamError, UpstreamResult},
};
use ethers::types::U256;

pub const REGISTRY_MINT: Pubkey = Pubkey::new_from_array([7u8; 32]);
pub const OWNER: Pubkey = Pubkey::new_from_array([1u8; 32]);
pub const OWNER_WITHOUT_ACCOUNTS: Pubkey = Pubkey::new_from_array([2u8; 32]);
pub const FIRST_ACCOUNT: Pubkey = Pubkey::new_from_array([11u8; 32]);
pub const SECOND_ACCOUNT: Pubkey = Pubkey::new_from_array([12u8; 32]);

pub fn wei(ether_milli: u64) -> U256 {
    U256::from(ether_milli) * U256::exp10(15)
}

pub fn ui_amount(ui: f64, decimals: u8) -> UiTokenAmount {
    UiTokenAmount {
        amount: format!("{}", (ui * 10f64.powi(decimals as i32)) as u128),
        decimals,
        ui_amount: Some(ui),
        ui_amount_string: Some(ui.to_string()),
    }
}

/// 质押合约替身：按地址返回固定记录
#[derive(Default)]
pub struct FakeStaking {
    pub records: HashMap<String, RawUserData>,
    pub failure: Option<UpstreamError>,
    pub delay: Option<Duration>,
}

impl FakeStaking {
    pub fn with_record(mut self, address: &str, staked: U256, rewards: U256) -> Self {
        self.records.insert(
            address.to_string(),
            RawUserData {
                total_staked: staked,
                unclaimed_rewards: rewards,
            },
        );
        self
    }
}

#[async_trait]
impl StakingReader for FakeStaking {
    async fn user_data(&self, address: &str) -> UpstreamResult<RawUserData> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.records.get(address).copied().unwrap_or_default())
    }
}

/// 代币账本替身，记录 token_supply 收到的 mint
#[derive(Default)]
pub struct FakeLedger {
    pub supply: Option<UiTokenAmount>,
    pub accounts: HashMap<Pubkey, Vec<TokenAccount>>,
    pub balances: HashMap<Pubkey, UiTokenAmount>,
    pub failure: Option<UpstreamError>,
    pub delay: Option<Duration>,
    pub supply_mints: Mutex<Vec<Pubkey>>,
}

impl FakeLedger {
    async fn pause_or_fail(&self) -> UpstreamResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub fn recorded_supply_mints(&self) -> Vec<Pubkey> {
        self.supply_mints
            .lock()
            .map(|mints| mints.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TokenLedger for FakeLedger {
    async fn token_supply(&self, mint: &Pubkey) -> UpstreamResult<UiTokenAmount> {
        if let Ok(mut mints) = self.supply_mints.lock() {
            mints.push(*mint);
        }
        self.pause_or_fail().await?;
        self.supply
            .clone()
            .ok_or_else(|| UpstreamError::Rpc {
                code: -32602,
                message: "Invalid param: not a Token mint".into(),
            })
    }

    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        _mint: &Pubkey,
    ) -> UpstreamResult<Vec<TokenAccount>> {
        self.pause_or_fail().await?;
        Ok(self.accounts.get(owner).cloned().unwrap_or_default())
    }

    async fn token_account_balance(&self, account: &Pubkey) -> UpstreamResult<UiTokenAmount> {
        self.pause_or_fail().await?;
        self.balances
            .get(account)
            .cloned()
            .ok_or_else(|| UpstreamError::Rpc {
                code: -32602,
                message: "Invalid param: could not find account".into(),
            })
    }
}

/// 默认场景：OWNER 有两个账户，第一个余额 42.75，第二个 1000
pub fn default_ledger() -> FakeLedger {
    let mut ledger = FakeLedger {
        supply: Some(ui_amount(1_000_000.5, 6)),
        ..Default::default()
    };
    ledger.accounts.insert(
        OWNER,
        vec![
            TokenAccount {
                pubkey: FIRST_ACCOUNT,
            },
            TokenAccount {
                pubkey: SECOND_ACCOUNT,
            },
        ],
    );
    ledger.accounts.insert(OWNER_WITHOUT_ACCOUNTS, Vec::new());
    ledger.balances.insert(FIRST_ACCOUNT, ui_amount(42.75, 6));
    ledger.balances.insert(SECOND_ACCOUNT, ui_amount(1000.0, 6));
    ledger
}

pub fn state_with(
    staking: Arc<dyn StakingReader>,
    ledger: Arc<dyn TokenLedger>,
    timeout: Duration,
) -> Arc<AppState> {
    Arc::new(AppState::from_parts(staking, ledger, REGISTRY_MINT, timeout))
}
