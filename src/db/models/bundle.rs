use bigdecimal::{BigDecimal, Zero};

/// Identifier of the one and only bundle record
pub const BUNDLE_ID: &str = "1";

/// Process-wide singleton holding the native asset's USD price.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Bundle {
    pub id: String,
    pub eth_price: BigDecimal,
}

impl Default for Bundle {
    fn default() -> Self {
        Self {
            id: BUNDLE_ID.to_string(),
            eth_price: BigDecimal::zero(),
        }
    }
}
