// Solana JSON-RPC 客户端
// 直接通过 reqwest 调用节点 RPC：getTokenSupply / getTokenAccountsByOwner / getTokenAccountBalance

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use super::upstream::{TokenLedger, UpstreamError, UpstreamResult};
use crate::domain::{Pubkey, TokenAccount, UiTokenAmount};

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// 带 context 的返回值：{ "context": {...}, "value": T }
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

pub struct SolanaRpcClient {
    http_client: reqwest::Client,
    rpc_url: String,
}

impl SolanaRpcClient {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client: client,
            rpc_url: rpc_url.into(),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> UpstreamResult<T> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        tracing::debug!(method = method, endpoint = %self.rpc_url, "Sending Solana RPC request");

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(format!("{}: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Transport(format!(
                "{}: HTTP {}",
                method, status
            )));
        }

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedResponse(format!("{}: {}", method, e)))?;

        if let Some(error) = body.error {
            return Err(UpstreamError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        body.result.ok_or_else(|| {
            UpstreamError::MalformedResponse(format!("{}: missing result", method))
        })
    }
}

#[async_trait]
impl TokenLedger for SolanaRpcClient {
    async fn token_supply(&self, mint: &Pubkey) -> UpstreamResult<UiTokenAmount> {
        let supply: WithContext<UiTokenAmount> = self
            .rpc_call("getTokenSupply", json!([mint.to_string()]))
            .await?;
        Ok(supply.value)
    }

    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> UpstreamResult<Vec<TokenAccount>> {
        let accounts: WithContext<Vec<TokenAccount>> = self
            .rpc_call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "mint": mint.to_string() },
                    { "encoding": "base64" }
                ]),
            )
            .await?;
        Ok(accounts.value)
    }

    async fn token_account_balance(&self, account: &Pubkey) -> UpstreamResult<UiTokenAmount> {
        let balance: WithContext<UiTokenAmount> = self
            .rpc_call("getTokenAccountBalance", json!([account.to_string()]))
            .await?;
        Ok(balance.value)
    }
}
