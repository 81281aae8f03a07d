use std::{fmt, path::Path, sync::Arc, time::Duration};

use crate::{
    config::Config,
    domain::Pubkey,
    error::ConfigError,
    service::{
        evm_staking_client::{load_abi, EvmStakingClient},
        solana_client::SolanaRpcClient,
        upstream::{StakingReader, TokenLedger},
    },
};

/// 应用状态（链绑定注册表）
///
/// 启动时由配置一次性构建，之后只读；所有请求通过 `Arc<AppState>` 共享，无需加锁。
#[derive(Clone)]
pub struct AppState {
    /// EVM 质押合约只读句柄
    pub staking: Arc<dyn StakingReader>,
    /// Solana 连接句柄
    pub ledger: Arc<dyn TokenLedger>,
    /// 启动时解析好的代币 mint，所有 Solana 查询都使用它
    pub token_mint: Pubkey,
    /// 单次上游调用的截止时间
    pub upstream_timeout: Duration,
}

impl AppState {
    /// 解析配置并构建所有链绑定，任一必需项缺失即失败
    pub fn initialize(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let evm_rpc_url = config
            .evm
            .rpc_url
            .as_deref()
            .ok_or(ConfigError::Missing("SEPOLIA_RPC_URL"))?;
        let staking_address = config
            .evm
            .staking_address
            .as_deref()
            .ok_or(ConfigError::Missing("STAKING_ADDRESS"))?;
        let solana_rpc_url = config
            .solana
            .rpc_url
            .as_deref()
            .ok_or(ConfigError::Missing("SOLANA_RPC_URL"))?;
        let token_address = config
            .solana
            .token_address
            .as_deref()
            .ok_or(ConfigError::Missing("TOKEN_ADDRESS"))?;

        let abi = load_abi(Path::new(&config.evm.abi_path))?;
        let staking = EvmStakingClient::new(evm_rpc_url, staking_address, abi)?;
        tracing::info!(
            contract = staking.contract_address(),
            abi = %config.evm.abi_path,
            "EVM staking binding initialized"
        );

        let token_mint: Pubkey = token_address.parse().map_err(|e| ConfigError::Invalid {
            name: "TOKEN_ADDRESS",
            reason: format!("{}", e),
        })?;
        let ledger = SolanaRpcClient::new(solana_rpc_url);
        tracing::info!(
            mint = %token_mint,
            endpoint = ledger.rpc_url(),
            "Solana token binding initialized"
        );

        Ok(Self::from_parts(
            Arc::new(staking),
            Arc::new(ledger),
            token_mint,
            config.upstream.timeout(),
        ))
    }

    /// 由现成的链句柄组装（测试中注入替身实现）
    pub fn from_parts(
        staking: Arc<dyn StakingReader>,
        ledger: Arc<dyn TokenLedger>,
        token_mint: Pubkey,
        upstream_timeout: Duration,
    ) -> Self {
        Self {
            staking,
            ledger,
            token_mint,
            upstream_timeout,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("token_mint", &self.token_mint)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EvmConfig, LoggingConfig, ServerConfig, SolanaConfig, UpstreamConfig};

    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            evm: EvmConfig {
                rpc_url: Some("http://localhost:8545".into()),
                staking_address: Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".into()),
                abi_path: concat!(env!("CARGO_MANIFEST_DIR"), "/abi/stakingABI.json").into(),
            },
            solana: SolanaConfig {
                rpc_url: Some("http://localhost:8899".into()),
                token_address: Some(MINT.into()),
            },
            upstream: UpstreamConfig { timeout_ms: 1_500 },
            logging: LoggingConfig {
                level: "info".into(),
                format: "text".into(),
            },
        }
    }

    #[test]
    fn test_initialize_resolves_bindings() {
        let state = AppState::initialize(&config()).unwrap();
        assert_eq!(state.token_mint.to_string(), MINT);
        assert_eq!(state.upstream_timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn test_missing_evm_endpoint_is_fatal() {
        let mut cfg = config();
        cfg.evm.rpc_url = None;
        let err = AppState::initialize(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SEPOLIA_RPC_URL")));
    }

    #[test]
    fn test_missing_staking_address_is_fatal() {
        let mut cfg = config();
        cfg.evm.staking_address = None;
        let err = AppState::initialize(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("STAKING_ADDRESS")));
    }

    #[test]
    fn test_token_mint_must_resolve() {
        let mut cfg = config();
        cfg.solana.token_address = Some("not-base58-0OIl".into());
        let err = AppState::initialize(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "TOKEN_ADDRESS", .. }));
    }

    #[test]
    fn test_missing_abi_file_is_fatal() {
        let mut cfg = config();
        cfg.evm.abi_path = "/nonexistent/stakingABI.json".into();
        assert!(matches!(
            AppState::initialize(&cfg),
            Err(ConfigError::Io { .. })
        ));
    }
}
