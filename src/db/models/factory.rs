use bigdecimal::{BigDecimal, Zero};

/// Exchange-wide aggregates, updated by the event processor.
///
/// Liquidity totals only include the whitelist-tracked portion of each pair.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Factory {
    pub pair_count: u64,
    pub total_volume_usd: BigDecimal,
    pub total_volume_eth: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub total_liquidity_eth: BigDecimal,
    pub total_liquidity_usd: BigDecimal,
    pub tx_count: u64,
}

impl Default for Factory {
    fn default() -> Self {
        Self {
            pair_count: 0,
            total_volume_usd: BigDecimal::zero(),
            total_volume_eth: BigDecimal::zero(),
            untracked_volume_usd: BigDecimal::zero(),
            total_liquidity_eth: BigDecimal::zero(),
            total_liquidity_usd: BigDecimal::zero(),
            tx_count: 0,
        }
    }
}
