use bigdecimal::{BigDecimal, One, Zero};
use log::warn;

use super::{PairRegistry, PriceResolver, PricingError};
use crate::{db::EntityStore, utils::ZERO_ADDRESS};

impl PriceResolver {
    /// Derive a token's price in native-asset units.
    ///
    /// The native asset is exactly 1. Any other token is priced through the
    /// first whitelisted counter-party, in whitelist order, that has a pair
    /// with the token above the minimum liquidity threshold:
    ///
    /// `token_eth = counterparty_per_token × counterparty.derived_eth`
    ///
    /// First match wins; there is no averaging across candidates and no
    /// second hop. Returns 0 if no candidate qualifies.
    ///
    /// The counter-party's `derived_eth` must already be current: callers
    /// process events in chain order. A counter-party that was never priced is
    /// an ordering violation and fails with [`PricingError::UnpricedToken`]; one
    /// priced at zero propagates zero.
    pub fn find_eth_per_token<S, R>(
        &self,
        token: &str,
        store: &S,
        registry: &R,
    ) -> Result<BigDecimal, PricingError>
    where
        S: EntityStore + ?Sized,
        R: PairRegistry + ?Sized,
    {
        if self.settings.is_native(token) {
            return Ok(BigDecimal::one());
        }

        for candidate in &self.settings.whitelist {
            let pair_address = registry.get_pair(token, candidate)?;
            if pair_address == ZERO_ADDRESS {
                continue;
            }

            let pair = store
                .load_pair(&pair_address)?
                .ok_or_else(|| PricingError::MissingPair {
                    pair: pair_address.clone(),
                })?;

            if pair.reserve_eth <= self.settings.minimum_liquidity_threshold_eth {
                continue;
            }

            let (counterparty, rate) =
                pair.counterparty(token).ok_or_else(|| PricingError::PairMismatch {
                    pair: pair_address.clone(),
                    token: token.to_string(),
                })?;

            let counterparty_token = store.load_token(counterparty)?.ok_or_else(|| {
                PricingError::MissingToken {
                    token: counterparty.to_string(),
                    pair: pair_address.clone(),
                }
            })?;

            let Some(counterparty_eth) = counterparty_token.derived_eth else {
                return Err(PricingError::UnpricedToken(counterparty_token.address));
            };

            if counterparty_eth.is_zero() {
                warn!(
                    "Pricing {} through {} whose derived ETH is zero (pair {})",
                    token, counterparty, pair_address
                );
            }

            return Ok(rate * counterparty_eth);
        }

        Ok(BigDecimal::zero())
    }
}
