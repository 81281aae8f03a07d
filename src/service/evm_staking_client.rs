// EVM 质押合约客户端
// 通过 ethers-rs 的 Provider<Http> + ABI 读取 userData(address)

use std::{path::Path, str::FromStr, sync::Arc};

use async_trait::async_trait;
use ethers::{
    abi::{Abi, Token},
    contract::{Contract, ContractError},
    providers::{Http, Provider, RpcError},
    types::{Address, U256},
};

use super::upstream::{StakingReader, UpstreamError, UpstreamResult};
use crate::{domain::RawUserData, error::ConfigError};

pub const USER_DATA_FN: &str = "userData";
const TOTAL_STAKED_FIELD: &str = "totalStaked";
const UNCLAIMED_REWARDS_FIELD: &str = "unclaimedRewards";

/// 读取 ABI 文件，支持纯 ABI 数组和带 `abi` 字段的编译产物两种格式
pub fn load_abi(path: &Path) -> Result<Abi, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            name: "STAKING_ABI_PATH",
            reason: format!("{}: {}", path.display(), e),
        })?;
    let abi_value = match value {
        serde_json::Value::Object(mut artifact) => artifact
            .remove("abi")
            .unwrap_or(serde_json::Value::Object(artifact)),
        other => other,
    };

    serde_json::from_value(abi_value).map_err(|e| ConfigError::Invalid {
        name: "STAKING_ABI_PATH",
        reason: format!("{}: {}", path.display(), e),
    })
}

/// 质押合约只读绑定
///
/// 节点 URL 与合约地址在启动时只要求存在：格式错误的值
/// 表现为单次请求的上游失败，而不是启动失败。
pub struct EvmStakingClient {
    provider: Result<Arc<Provider<Http>>, String>,
    contract_address: String,
    abi: Abi,
    total_staked_index: usize,
    unclaimed_rewards_index: usize,
}

impl EvmStakingClient {
    pub fn new(
        rpc_url: &str,
        contract_address: impl Into<String>,
        abi: Abi,
    ) -> Result<Self, ConfigError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map(Arc::new)
            .map_err(|e| format!("{}: {}", rpc_url, e));
        if let Err(reason) = &provider {
            tracing::warn!(reason = %reason, "EVM endpoint URL is malformed, staking queries will fail");
        }

        let function = abi
            .function(USER_DATA_FN)
            .map_err(|e| ConfigError::Invalid {
                name: "STAKING_ABI_PATH",
                reason: e.to_string(),
            })?;
        let output_index = |field: &str| {
            function
                .outputs
                .iter()
                .position(|param| param.name == field)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "STAKING_ABI_PATH",
                    reason: format!("{} has no output named {}", USER_DATA_FN, field),
                })
        };
        let total_staked_index = output_index(TOTAL_STAKED_FIELD)?;
        let unclaimed_rewards_index = output_index(UNCLAIMED_REWARDS_FIELD)?;

        Ok(Self {
            provider,
            contract_address: contract_address.into(),
            abi,
            total_staked_index,
            unclaimed_rewards_index,
        })
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }
}

#[async_trait]
impl StakingReader for EvmStakingClient {
    async fn user_data(&self, address: &str) -> UpstreamResult<RawUserData> {
        let provider = self
            .provider
            .as_ref()
            .map_err(|reason| UpstreamError::Transport(format!("invalid endpoint {}", reason)))?;
        let contract_address = Address::from_str(&self.contract_address).map_err(|e| {
            UpstreamError::InvalidAddress(format!(
                "staking contract {}: {}",
                self.contract_address, e
            ))
        })?;
        let user = Address::from_str(address)
            .map_err(|e| UpstreamError::InvalidAddress(format!("{}: {}", address, e)))?;

        let contract = Contract::new(contract_address, self.abi.clone(), provider.clone());
        let output = contract
            .method::<_, Token>(USER_DATA_FN, user)
            .map_err(|e| UpstreamError::Contract(e.to_string()))?
            .call()
            .await
            .map_err(classify_contract_error)?;

        let fields = match output {
            Token::Tuple(fields) => fields,
            other => {
                return Err(UpstreamError::MalformedResponse(format!(
                    "{} returned {:?}, expected a tuple",
                    USER_DATA_FN, other
                )))
            }
        };

        Ok(RawUserData {
            total_staked: uint_at(&fields, self.total_staked_index, TOTAL_STAKED_FIELD)?,
            unclaimed_rewards: uint_at(
                &fields,
                self.unclaimed_rewards_index,
                UNCLAIMED_REWARDS_FIELD,
            )?,
        })
    }
}

fn uint_at(fields: &[Token], index: usize, field: &str) -> UpstreamResult<U256> {
    match fields.get(index) {
        Some(Token::Uint(value)) => Ok(*value),
        other => Err(UpstreamError::MalformedResponse(format!(
            "{}: expected uint256, got {:?}",
            field, other
        ))),
    }
}

fn classify_contract_error(err: ContractError<Provider<Http>>) -> UpstreamError {
    if let Some(data) = err.as_revert() {
        return UpstreamError::Contract(format!("execution reverted: {}", data));
    }
    if let Some(provider_err) = err.as_middleware_error() {
        if let Some(rpc_err) = provider_err.as_error_response() {
            return UpstreamError::Rpc {
                code: rpc_err.code,
                message: rpc_err.message.clone(),
            };
        }
        return UpstreamError::Transport(provider_err.to_string());
    }
    UpstreamError::MalformedResponse(err.to_string())
}
