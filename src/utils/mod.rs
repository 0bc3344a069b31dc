//! Utility functions for the reservoir indexer.
//!
//! - [`conversion`] - Raw on-chain integers to decimals, hex encoding

mod conversion;

// ============================================
// Common Constants
// ============================================

/// The Ethereum zero address (0x0000000000000000000000000000000000000000)
/// Returned by the pair registry when no pair exists; also the sender of LP mints.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

// ============================================
// Re-exports
// ============================================

pub use conversion::{convert_token_to_decimal, hex_encode};
