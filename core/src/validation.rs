//! Input validation for EVM addresses and token amounts
//!
//! Validation runs at the entry point of every action, before any remote
//! call is attempted.

use std::str::FromStr;

use alloy_primitives::Address;

use crate::error::{Error, Result};

/// Convert an address to its EIP-55 checksummed form
///
/// Accepts 20-byte hex strings with or without the `0x` prefix, in any case.
pub fn validate_address(address: &str) -> Result<String> {
    Address::from_str(address)
        .map(|parsed| parsed.to_checksum(None))
        .map_err(|_| Error::InvalidAddress(address.to_string()))
}

/// Check that an amount parses as a finite number strictly greater than zero
///
/// Digits may be grouped with single underscores (`1_000`). The original
/// string is returned untouched so that downstream policy and parameter
/// objects carry exactly what the caller supplied.
pub fn validate_amount(amount: &str) -> Result<String> {
    let value = strip_digit_separators(amount.trim()).and_then(|s| s.parse::<f64>().ok());
    match value {
        Some(value) if value.is_finite() && value > 0.0 => Ok(amount.to_string()),
        _ => Err(Error::InvalidAmount(amount.to_string())),
    }
}

/// Remove underscores that sit between two digits; any other underscore is invalid
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(out)
}
