//! # Utilities Module
//!
//! This module contains helper functions and utilities used
//! across the backend service.

use std::num::ParseIntError;

/// Number of MIST in one SUI.
pub const MIST_PER_SUI: u128 = 1_000_000_000;

/// Validate a Sui address or object ID.
///
/// Valid identifiers are `0x` followed by exactly 64 hex digits
/// (either case).
///
/// ## Examples
///
/// ```rust
/// use loyalty_badge_backend::utils::is_valid_sui_address;
///
/// assert!(is_valid_sui_address(&format!("0x{}", "0".repeat(64))));
/// assert!(!is_valid_sui_address("0x1"));
/// ```
pub fn is_valid_sui_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex_part) => {
            hex_part.len() == 64 && hex_part.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Format a balance in MIST as SUI.
///
/// Produces the shortest exact decimal: no trailing zeros and no
/// decimal point for whole amounts.
///
/// ## Examples
///
/// ```rust
/// use loyalty_badge_backend::utils::format_sui;
///
/// assert_eq!(format_sui(2_500_000_000), "2.5");
/// assert_eq!(format_sui(1_000_000_000), "1");
/// ```
pub fn format_sui(mist: u128) -> String {
    let whole = mist / MIST_PER_SUI;
    let frac = mist % MIST_PER_SUI;

    if frac == 0 {
        return whole.to_string();
    }

    let frac_str = format!("{:09}", frac);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

/// Parse a raw balance string (as returned by the node) and format it as SUI.
pub fn format_sui_str(raw: &str) -> Result<String, ParseIntError> {
    raw.trim().parse::<u128>().map(format_sui)
}
