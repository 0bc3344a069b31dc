use bigdecimal::{BigDecimal, Zero};
use log::{debug, warn};

use super::{PriceResolver, PricingError};
use crate::db::EntityStore;

/// A qualifying stablecoin reference pair.
struct ReferenceQuote {
    /// USD per native asset
    price: BigDecimal,
    /// Native-asset side reserve, used as the weight
    native_reserve: BigDecimal,
}

impl PriceResolver {
    /// Resolve the native asset's USD price from the DAI, USDC and USDT pairs.
    ///
    /// Tiers, most precise first:
    /// 1. DAI + USDC + USDT qualify → reserve-weighted average of the three
    /// 2. DAI + USDC qualify → reserve-weighted average of the two
    /// 3. USDC qualifies → USDC price
    /// 4. USDT qualifies → USDT price
    /// 5. DAI qualifies → DAI price
    /// 6. Otherwise 0
    ///
    /// A pair qualifies when it exists and its `reserve_eth` is strictly above
    /// the minimum liquidity threshold. Weighting by native-side reserve keeps a
    /// thin pool from dominating the price.
    pub fn eth_price_in_usd<S>(&self, store: &S) -> Result<BigDecimal, PricingError>
    where
        S: EntityStore + ?Sized,
    {
        let settings = &self.settings;
        let dai = self.reference_quote(store, &settings.dai_native_pair, &settings.dai)?;
        let usdc = self.reference_quote(store, &settings.usdc_native_pair, &settings.usdc)?;
        let usdt = self.reference_quote(store, &settings.usdt_native_pair, &settings.usdt)?;

        match (dai, usdc, usdt) {
            (Some(dai), Some(usdc), Some(usdt)) => weighted_average(&[dai, usdc, usdt]),
            (Some(dai), Some(usdc), None) => weighted_average(&[dai, usdc]),
            (_, Some(usdc), _) => Ok(usdc.price),
            (_, None, Some(usdt)) => Ok(usdt.price),
            (Some(dai), None, None) => Ok(dai.price),
            (None, None, None) => Ok(BigDecimal::zero()),
        }
    }

    /// Load a reference pair and keep it only if it qualifies for pricing.
    fn reference_quote<S>(
        &self,
        store: &S,
        pair_address: &str,
        stable: &str,
    ) -> Result<Option<ReferenceQuote>, PricingError>
    where
        S: EntityStore + ?Sized,
    {
        let Some(pair) = store.load_pair(pair_address)? else {
            debug!("Reference pair {} not indexed yet", pair_address);
            return Ok(None);
        };

        if pair.reserve_eth <= self.settings.minimum_liquidity_threshold_eth {
            return Ok(None);
        }

        let Some((price, native_reserve)) = pair.quote_against(stable) else {
            warn!(
                "Reference pair {} does not contain stablecoin {}, ignoring it",
                pair_address, stable
            );
            return Ok(None);
        };

        Ok(Some(ReferenceQuote {
            price: price.clone(),
            native_reserve: native_reserve.clone(),
        }))
    }
}

/// Σ price × (native_reserve / Σ native_reserve)
fn weighted_average(quotes: &[ReferenceQuote]) -> Result<BigDecimal, PricingError> {
    let total_liquidity: BigDecimal = quotes.iter().map(|q| &q.native_reserve).sum();
    if total_liquidity.is_zero() {
        return Err(PricingError::ZeroLiquidity);
    }

    Ok(quotes
        .iter()
        .map(|q| &q.price * (&q.native_reserve / &total_liquidity))
        .sum())
}
