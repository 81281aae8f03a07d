//! SPL 代币查询模型

use serde::{Deserialize, Serialize};

use super::pubkey::Pubkey;

/// RPC 返回的代币金额（getTokenSupply / getTokenAccountBalance）
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    /// 最小单位金额（十进制字符串）
    pub amount: String,
    pub decimals: u8,
    /// 已按 decimals 换算的金额，部分节点会返回 null
    #[serde(default)]
    pub ui_amount: Option<f64>,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

impl UiTokenAmount {
    /// 换算后的金额；uiAmount 为 null 时回退到 uiAmountString
    pub fn ui_value(&self) -> Option<f64> {
        self.ui_amount.or_else(|| {
            self.ui_amount_string
                .as_deref()
                .and_then(|s| s.parse::<f64>().ok())
        })
    }
}

/// 某个 owner 名下、指定 mint 的代币账户
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenAccount {
    pub pubkey: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSupply {
    pub total_supply: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBalance {
    /// 调用方传入的地址，原样回显
    pub address: String,
    /// 上游未给出换算金额时为 null
    pub balance: Option<f64>,
}
