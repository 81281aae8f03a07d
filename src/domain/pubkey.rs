//! Solana 公钥（Base58 编码，32 字节）

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Solana 公钥长度
pub const PUBKEY_BYTES: usize = 32;

/// Base58 字符串最大长度（32 字节编码后最多 44 个字符）
const MAX_BASE58_LEN: usize = 44;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePubkeyError {
    #[error("string too long for a public key: {0} chars")]
    TooLong(usize),
    #[error("invalid base58: {0}")]
    InvalidBase58(String),
    #[error("public key must be 32 bytes, got {0}")]
    WrongSize(usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }
}

impl FromStr for Pubkey {
    type Err = ParsePubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_BASE58_LEN {
            return Err(ParsePubkeyError::TooLong(s.len()));
        }

        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| ParsePubkeyError::InvalidBase58(e.to_string()))?;

        let bytes: [u8; PUBKEY_BYTES] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| ParsePubkeyError::WrongSize(decoded.len()))?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
