use bigdecimal::{BigDecimal, Zero};

/// Token metadata and pricing state.
///
/// Primary Key: address
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Token {
    // Primary key
    pub address: String,

    // Metadata (immutable after first registration)
    pub symbol: String,
    pub name: String,
    pub decimals: u8,

    /// Price in native-asset units. None until the first computation.
    pub derived_eth: Option<BigDecimal>,
    /// Block at which `derived_eth` was last computed
    pub derived_eth_block: Option<u64>,

    // Lifetime stats
    pub trade_volume: BigDecimal,
    pub trade_volume_usd: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub total_liquidity: BigDecimal,
    pub tx_count: u64,
}

impl Token {
    /// Constructor for just metadata
    pub fn new(address: String, symbol: String, name: String, decimals: u8) -> Self {
        Self {
            // Always lowercase addresses for consistent comparisons
            address: address.to_lowercase(),
            symbol,
            name,
            decimals,
            derived_eth: None,
            derived_eth_block: None,
            trade_volume: BigDecimal::zero(),
            trade_volume_usd: BigDecimal::zero(),
            untracked_volume_usd: BigDecimal::zero(),
            total_liquidity: BigDecimal::zero(),
            tx_count: 0,
        }
    }

    /// Record a freshly computed native-asset price.
    pub fn set_derived_eth(&mut self, derived_eth: BigDecimal, block_number: u64) {
        self.derived_eth = Some(derived_eth);
        self.derived_eth_block = Some(block_number);
    }
}
