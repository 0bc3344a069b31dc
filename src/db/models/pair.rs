use bigdecimal::{BigDecimal, Zero};

/// Constant-product liquidity pair and its current state.
///
/// Primary Key: address
///
/// Price convention (Uniswap V2 subgraph):
/// - token0_price = token0 per one token1 = reserve0 / reserve1
/// - token1_price = token1 per one token0 = reserve1 / reserve0
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Pair {
    // Primary key
    pub address: String,

    // Token pair (lowercase addresses)
    pub token0: String,
    pub token1: String,

    // Reserves, decimal-adjusted
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,

    // Total liquidity in native-asset units, and the whitelist-tracked portion
    pub reserve_eth: BigDecimal,
    pub tracked_reserve_eth: BigDecimal,
    pub reserve_usd: BigDecimal,

    // Spot prices
    pub token0_price: BigDecimal,
    pub token1_price: BigDecimal,

    // Lifetime stats
    pub volume_token0: BigDecimal,
    pub volume_token1: BigDecimal,
    pub volume_usd: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub tx_count: u64,

    /// Distinct addresses that have ever received LP tokens from a mint
    pub liquidity_provider_count: u64,

    pub created_at_block: u64,
}

impl Pair {
    pub fn new(address: String, token0: String, token1: String, created_at_block: u64) -> Self {
        Self {
            // Always lowercase addresses for consistent comparisons
            address: address.to_lowercase(),
            token0: token0.to_lowercase(),
            token1: token1.to_lowercase(),
            reserve0: BigDecimal::zero(),
            reserve1: BigDecimal::zero(),
            reserve_eth: BigDecimal::zero(),
            tracked_reserve_eth: BigDecimal::zero(),
            reserve_usd: BigDecimal::zero(),
            token0_price: BigDecimal::zero(),
            token1_price: BigDecimal::zero(),
            volume_token0: BigDecimal::zero(),
            volume_token1: BigDecimal::zero(),
            volume_usd: BigDecimal::zero(),
            untracked_volume_usd: BigDecimal::zero(),
            tx_count: 0,
            liquidity_provider_count: 0,
            created_at_block,
        }
    }

    /// Replace reserves and recompute both spot prices.
    ///
    /// A zero reserve on one side leaves the price that would divide by it at zero.
    pub fn set_reserves(&mut self, reserve0: BigDecimal, reserve1: BigDecimal) {
        self.token0_price = if reserve1.is_zero() {
            BigDecimal::zero()
        } else {
            &reserve0 / &reserve1
        };
        self.token1_price = if reserve0.is_zero() {
            BigDecimal::zero()
        } else {
            &reserve1 / &reserve0
        };
        self.reserve0 = reserve0;
        self.reserve1 = reserve1;
    }

    /// Price of the other token in units of `stable`, and the other token's reserve.
    ///
    /// For a native/stable pair this is (USD per native, native reserve).
    /// Returns None if `stable` is not part of the pair.
    pub fn quote_against(&self, stable: &str) -> Option<(&BigDecimal, &BigDecimal)> {
        if self.token0 == stable {
            Some((&self.token0_price, &self.reserve1))
        } else if self.token1 == stable {
            Some((&self.token1_price, &self.reserve0))
        } else {
            None
        }
    }

    /// The other token of the pair and how many of it one `token` buys.
    ///
    /// Returns None if `token` is not part of the pair.
    pub fn counterparty(&self, token: &str) -> Option<(&str, &BigDecimal)> {
        if self.token0 == token {
            Some((&self.token1, &self.token1_price))
        } else if self.token1 == token {
            Some((&self.token0, &self.token0_price))
        } else {
            None
        }
    }
}
