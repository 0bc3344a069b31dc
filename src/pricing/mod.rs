//! On-chain price derivation.
//!
//! Resolves token prices from pair reserves only, no external feed:
//! 1. Native asset → USD from the three stablecoin reference pairs ([`reference`])
//! 2. Any token → native asset via its first whitelisted counter-party ([`discovery`])
//! 3. Swap and liquidity amounts → tracked USD based on the whitelist ([`tracker`])
//!
//! Everything here is a pure read over a store snapshot. The caller must apply
//! events in chain order so that counter-party prices are current.

mod discovery;
mod error;
mod reference;
mod registry;
mod tracker;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::{config::PricingSettings, db::models::Token};

pub use error::PricingError;
pub use registry::{PairIndex, PairRegistry};

/// Price resolution for USD calculations.
///
/// Uses the Uniswap V2 subgraph's whitelist approach:
/// - The native asset price is a liquidity-weighted average of stablecoin pairs
/// - Token prices propagate one hop from whitelisted counter-parties
/// - USD volume is only tracked when at least one side is whitelisted
pub struct PriceResolver {
    settings: Arc<PricingSettings>,
}

impl PriceResolver {
    pub fn new(settings: Arc<PricingSettings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PricingSettings {
        &self.settings
    }

    /// Check if a token is on the whitelist (wrapped native or stablecoin by default).
    pub fn is_whitelisted(&self, token: &str) -> bool {
        self.settings.is_whitelisted(token)
    }

    /// USD price of a token: derived ETH × ETH price.
    fn usd_price(token: &Token, eth_price: &BigDecimal) -> Result<BigDecimal, PricingError> {
        let derived_eth = token
            .derived_eth
            .as_ref()
            .ok_or_else(|| PricingError::UnpricedToken(token.address.clone()))?;

        Ok(derived_eth * eth_price)
    }
}
