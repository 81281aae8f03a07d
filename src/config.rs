//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub evm: EvmConfig,
    #[serde(default)]
    pub solana: SolanaConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// EVM 链（质押合约）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvmConfig {
    pub rpc_url: Option<String>,
    pub staking_address: Option<String>,
    pub abi_path: String,
}

/// Solana 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolanaConfig {
    pub rpc_url: Option<String>,
    pub token_address: Option<String>,
}

/// 上游调用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub timeout_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 读取环境变量，空字符串视为未设置
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env_opt("BIND_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: env_opt("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self {
            rpc_url: env_opt("SEPOLIA_RPC_URL"),
            staking_address: env_opt("STAKING_ADDRESS"),
            abi_path: env_opt("STAKING_ABI_PATH").unwrap_or_else(|| "abi/stakingABI.json".into()),
        }
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: env_opt("SOLANA_RPC_URL"),
            token_address: env_opt("TOKEN_ADDRESS"),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_ms: env_opt("UPSTREAM_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: env_opt("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            format: env_opt("LOG_FORMAT").unwrap_or_else(|| "text".into()),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::default()
    }

    /// 从配置文件加载配置，文件中未出现的字段回退到环境变量/默认值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                source,
            })?;

        Ok(toml::from_str(&content)?)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.as_ref().exists() => Self::from_file(path),
            _ => Ok(Self::from_env()),
        }
    }

    /// 进程启动时使用：`CONFIG_PATH` 指定的文件 + 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env_and_file(env_opt("CONFIG_PATH"))
    }

    /// 验证配置有效性
    ///
    /// 只检查必需项是否存在；地址/URL 的格式问题在对应的上游调用中暴露。
    pub fn validate(&self) -> Result<(), ConfigError> {
        // EVM 必需项优先检查
        if self.evm.rpc_url.is_none() {
            return Err(ConfigError::Missing("SEPOLIA_RPC_URL"));
        }
        if self.evm.staking_address.is_none() {
            return Err(ConfigError::Missing("STAKING_ADDRESS"));
        }
        if self.solana.rpc_url.is_none() {
            return Err(ConfigError::Missing("SOLANA_RPC_URL"));
        }
        if self.solana.token_address.is_none() {
            return Err(ConfigError::Missing("TOKEN_ADDRESS"));
        }

        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_MS",
                reason: "must be greater than 0".into(),
            });
        }

        // 验证日志格式
        if self.logging.format != "json" && self.logging.format != "text" {
            return Err(ConfigError::Invalid {
                name: "LOG_FORMAT",
                reason: "must be 'json' or 'text'".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn complete() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            evm: EvmConfig {
                rpc_url: Some("https://rpc.sepolia.org".into()),
                staking_address: Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".into()),
                abi_path: "abi/stakingABI.json".into(),
            },
            solana: SolanaConfig {
                rpc_url: Some("https://api.devnet.solana.com".into()),
                token_address: Some("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".into()),
            },
            upstream: UpstreamConfig { timeout_ms: 5_000 },
            logging: LoggingConfig {
                level: "info".into(),
                format: "text".into(),
            },
        }
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[evm]
rpc_url = "https://rpc.sepolia.org"
staking_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
abi_path = "abi/stakingABI.json"

[solana]
rpc_url = "https://api.devnet.solana.com"
token_address = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"

[upstream]
timeout_ms = 2500

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.upstream.timeout(), Duration::from_millis(2500));
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_evm_settings_fail_first() {
        let mut config = complete();
        config.evm.rpc_url = None;
        config.solana.token_address = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("SEPOLIA_RPC_URL"))
        ));

        let mut config = complete();
        config.evm.staking_address = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("STAKING_ADDRESS"))
        ));
    }

    #[test]
    fn test_malformed_but_present_values_pass_validation() {
        let mut config = complete();
        config.evm.staking_address = Some("definitely-not-an-address".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(complete().validate().is_ok());

        let mut config = complete();
        config.logging.format = "yaml".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "LOG_FORMAT", .. })
        ));

        let mut config = complete();
        config.upstream.timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
