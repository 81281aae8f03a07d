pub mod evm_staking_client;
pub mod query_service;
pub mod solana_client;
pub mod upstream;

pub use evm_staking_client::EvmStakingClient;
pub use solana_client::SolanaRpcClient;
pub use upstream::{StakingReader, TokenLedger, UpstreamError, UpstreamResult};
