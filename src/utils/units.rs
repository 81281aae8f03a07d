//! 定点数金额换算
//!
//! EVM 链金额统一使用 18 位小数（wei ↔ ether），全程走 U256 整数运算，
//! 不经过 f64，避免大额数值丢精度。

use ethers::{
    types::U256,
    utils::{format_units, parse_units, ConversionError},
};

/// EVM 原生单位的小数位数
pub const ETHER_DECIMALS: u32 = 18;

/// wei → 十进制字符串（"2.5"、"1.0"、"0.0"）
///
/// 与常见钱包/SDK 的 formatEther 输出一致：去掉小数末尾多余的 0，
/// 但至少保留一位小数。
pub fn format_ether(wei: U256) -> Result<String, ConversionError> {
    let full = format_units(wei, ETHER_DECIMALS)?;
    Ok(trim_fraction(&full))
}

/// 十进制字符串 → wei
pub fn parse_ether(amount: &str) -> Result<U256, ConversionError> {
    parse_units(amount, ETHER_DECIMALS).map(Into::into)
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((int_part, frac_part)) => {
            let frac_part = frac_part.trim_end_matches('0');
            if frac_part.is_empty() {
                format!("{}.0", int_part)
            } else {
                format!("{}.{}", int_part, frac_part)
            }
        }
        None => format!("{}.0", formatted),
    }
}
