//! Wei quantities: hex parsing and ether display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::paths::rpc::{DISPLAY_DECIMALS, WEI_PER_ETHER};
use crate::error::{Error, Result};

/// Parse a JSON-RPC hex quantity (`"0x1bc16d674ec80000"`).
pub fn parse_hex_quantity(value: &str) -> Result<u128> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| Error::Quantity(format!("missing 0x prefix: {value}")))?;
    if digits.is_empty() {
        return Err(Error::Quantity("empty quantity".into()));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::Quantity(format!("not a hex quantity: {value}")));
    }
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(trimmed, 16).map_err(|e| Error::Quantity(format!("{value}: {e}")))
}

/// Ether with four decimals, rounded half-up. Zero renders as `"0"`.
pub fn format_ether(wei: u128) -> String {
    if wei == 0 {
        return "0".into();
    }
    let step = WEI_PER_ETHER / 10u128.pow(DISPLAY_DECIMALS);
    let mut units = wei / step;
    if wei % step >= step / 2 {
        units += 1;
    }
    let scale = 10u128.pow(DISPLAY_DECIMALS);
    format!("{}.{:0width$}", units / scale, units % scale, width = DISPLAY_DECIMALS as usize)
}

/// Last known balance of one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub address: String,
    /// Decimal string; u128 does not fit a JSON number
    pub wei: String,
    pub ether: String,
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    pub fn new(address: impl Into<String>, wei: u128) -> Self {
        Self {
            address: address.into(),
            wei: wei.to_string(),
            ether: format_ether(wei),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quantities() {
        assert_eq!(parse_hex_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_hex_quantity("0x1bc16d674ec80000").unwrap(), 2 * WEI_PER_ETHER);
        assert_eq!(parse_hex_quantity("0X00ff").unwrap(), 255);
        assert!(parse_hex_quantity("ff").is_err());
        assert!(parse_hex_quantity("0x").is_err());
        assert!(parse_hex_quantity("0xnothex").is_err());
        assert!(matches!(parse_hex_quantity("0x+ff"), Err(Error::Quantity(_))));
        assert!(matches!(parse_hex_quantity("0x-1"), Err(Error::Quantity(_))));
        assert!(parse_hex_quantity("0x 1").is_err());
        assert!(parse_hex_quantity(&format!("0x1{}", "0".repeat(32))).is_err());
    }

    #[test]
    fn ether_formatting() {
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(WEI_PER_ETHER), "1.0000");
        assert_eq!(format_ether(WEI_PER_ETHER * 3 / 2), "1.5000");
        assert_eq!(format_ether(123_456_789_000_000_000), "0.1235");
        assert_eq!(format_ether(123_440_000_000_000_000), "0.1234");
        // dust rounds to zero but keeps the decimals
        assert_eq!(format_ether(1), "0.0000");
        assert_eq!(format_ether(50_000_000_000_000), "0.0001");
        assert_eq!(format_ether(42 * WEI_PER_ETHER + 99_995_000_000_000_000), "42.1000");
    }

    #[test]
    fn balance_keeps_exact_wei() {
        let b = Balance::new("0xabc", u128::MAX);
        assert_eq!(b.wei, u128::MAX.to_string());
        assert_eq!(b.address, "0xabc");

        let json = serde_json::to_value(&b).unwrap();
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("updated_at").is_none());
    }
}
