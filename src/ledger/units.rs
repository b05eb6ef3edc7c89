// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

//! Ether/wei conversions. Display prices cross the API as decimal
//! strings and become integer wei only at the ledger boundary.

use alloy::primitives::U256;

use super::types::LedgerError;

const ETHER_DECIMALS: u32 = 18;

/// Parse a human-readable ether amount (e.g. "0.05") to wei.
pub fn parse_ether(amount: &str) -> Result<U256, LedgerError> {
    let amount = amount.trim();
    let parts: Vec<&str> = amount.split('.').collect();

    if amount.is_empty() || parts.len() > 2 {
        return Err(LedgerError::InvalidAmount(format!(
            "not a decimal amount: {amount:?}"
        )));
    }

    let whole = parts[0]
        .parse::<u128>()
        .map_err(|_| LedgerError::InvalidAmount(format!("invalid whole part: {amount:?}")))?;

    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > ETHER_DECIMALS as usize {
            return Err(LedgerError::InvalidAmount(format!(
                "too many decimal places (max {ETHER_DECIMALS})"
            )));
        }
        // Pad with zeros up to wei precision
        let padded = format!("{:0<width$}", dec_str, width = ETHER_DECIMALS as usize);
        padded
            .parse::<u128>()
            .map_err(|_| LedgerError::InvalidAmount(format!("invalid decimal part: {amount:?}")))?
    } else {
        0u128
    };

    let multiplier = 10u128.pow(ETHER_DECIMALS);
    let total = whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(decimal_part))
        .ok_or_else(|| LedgerError::InvalidAmount("amount overflow".to_string()))?;

    Ok(U256::from(total))
}

/// Format wei as a human-readable ether amount.
pub fn format_ether(amount: U256) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(ETHER_DECIMALS));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = ETHER_DECIMALS as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_ether() {
        let result = parse_ether("1").unwrap();
        assert_eq!(result, U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn parse_decimal_ether() {
        let result = parse_ether("1.5").unwrap();
        assert_eq!(result, U256::from(1_500_000_000_000_000_000u64));
    }

    #[test]
    fn parse_listing_price() {
        // The canonical 0.05 ETH listing price
        let result = parse_ether("0.05").unwrap();
        assert_eq!(result, U256::from(50_000_000_000_000_000u64));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_ether("").is_err());
        assert!(parse_ether("1.2.3").is_err());
        assert!(parse_ether("abc").is_err());
        assert!(parse_ether("-1").is_err());
    }

    #[test]
    fn format_round_trips() {
        let one_and_half = U256::from(1_500_000_000_000_000_000u64);
        assert_eq!(format_ether(one_and_half), "1.5");
        assert_eq!(parse_ether(&format_ether(one_and_half)).unwrap(), one_and_half);

        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(U256::from(1_000_000_000_000_000_000u64)), "1");
    }
}
