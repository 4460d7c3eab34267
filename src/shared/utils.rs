//! Utility functions and helpers

use alloy_primitives::U256;
use std::str::FromStr;

/// Format amount with proper decimals, e.g. `1500000000000000000` -> `1.500000`
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / scale;
    let frac = format!("{:0>width$}", (amount % scale).to_string(), width = decimals as usize);
    let shown = frac.get(..6).unwrap_or(&frac);
    format!("{}.{}", whole, shown)
}

/// Parse a decimal (or `0x`-prefixed hex) integer amount
pub fn parse_amount(raw: &str) -> anyhow::Result<U256> {
    let trimmed = raw.trim().replace('_', "");
    U256::from_str(&trimmed).map_err(|e| anyhow::anyhow!("Invalid amount '{}': {}", raw, e))
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
