//! Type conversion and formatting utilities.
//!
//! Raw token amounts arrive as U256 integers; everything downstream works on
//! decimal-adjusted `BigDecimal` values.

use alloy::primitives::{hex, U256};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

// ============================================
// Hex Encoding
// ============================================

/// Encode bytes as a lowercase hex string with 0x prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ============================================
// U256 Conversions
// ============================================

/// Convert a raw token amount to a decimal-adjusted `BigDecimal`.
///
/// Exact: no f64 round trip, so reserves and amounts keep full precision.
///
/// # Example
/// ```ignore
/// let value = U256::from(1_500_000_000_000_000_000u128); // 1.5e18
/// let adjusted = convert_token_to_decimal(value, 18); // 1.5
/// ```
pub fn convert_token_to_decimal(value: U256, decimals: u8) -> BigDecimal {
    let bytes: [u8; 32] = value.to_le_bytes();
    let big_int = BigInt::from_bytes_le(Sign::Plus, &bytes);

    if decimals == 0 {
        return BigDecimal::from(big_int);
    }

    // Shifting the scale is exact, unlike dividing by 10^decimals
    BigDecimal::new(big_int, decimals as i64).normalized()
}
