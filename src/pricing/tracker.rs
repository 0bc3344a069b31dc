use bigdecimal::{BigDecimal, Zero};

use super::{PriceResolver, PricingError};
use crate::db::models::{Pair, Token};

impl PriceResolver {
    /// Tracked USD volume of a swap.
    ///
    /// - Pair on the untracked list → 0
    /// - Pair with few liquidity providers → 0 unless its whitelisted reserves
    ///   are worth at least the new-pair USD threshold
    /// - Both tokens whitelisted → average of both sides' USD value
    /// - One token whitelisted → that side's USD value
    /// - Neither → 0
    pub fn tracked_volume_usd(
        &self,
        amount0: &BigDecimal,
        token0: &Token,
        amount1: &BigDecimal,
        token1: &Token,
        pair: &Pair,
        eth_price: &BigDecimal,
    ) -> Result<BigDecimal, PricingError> {
        // Rebasing and otherwise broken tokens
        if self.settings.is_untracked_pair(&pair.address) {
            return Ok(BigDecimal::zero());
        }

        let price0 = Self::usd_price(token0, eth_price)?;
        let price1 = Self::usd_price(token1, eth_price)?;

        let whitelisted0 = self.is_whitelisted(&token0.address);
        let whitelisted1 = self.is_whitelisted(&token1.address);

        if pair.liquidity_provider_count < self.settings.minimum_liquidity_providers {
            let reserve0_usd = &pair.reserve0 * &price0;
            let reserve1_usd = &pair.reserve1 * &price1;
            let threshold = &self.settings.minimum_usd_threshold_new_pairs;
            let two = BigDecimal::from(2);

            let too_thin = match (whitelisted0, whitelisted1) {
                (true, true) => &(reserve0_usd + reserve1_usd) < threshold,
                (true, false) => &(reserve0_usd * &two) < threshold,
                (false, true) => &(reserve1_usd * &two) < threshold,
                (false, false) => false,
            };

            if too_thin {
                return Ok(BigDecimal::zero());
            }
        }

        Ok(match (whitelisted0, whitelisted1) {
            (true, true) => (amount0 * &price0 + amount1 * &price1) / BigDecimal::from(2),
            (true, false) => amount0 * &price0,
            (false, true) => amount1 * &price1,
            (false, false) => BigDecimal::zero(),
        })
    }

    /// Tracked USD value of liquidity amounts (mint/burn amounts or reserves).
    ///
    /// - Both tokens whitelisted → sum of both sides' USD value
    /// - One token whitelisted → that side's USD value × 2, assuming a balanced pool
    /// - Neither → 0
    pub fn tracked_liquidity_usd(
        &self,
        amount0: &BigDecimal,
        token0: &Token,
        amount1: &BigDecimal,
        token1: &Token,
        eth_price: &BigDecimal,
    ) -> Result<BigDecimal, PricingError> {
        let price0 = Self::usd_price(token0, eth_price)?;
        let price1 = Self::usd_price(token1, eth_price)?;

        let whitelisted0 = self.is_whitelisted(&token0.address);
        let whitelisted1 = self.is_whitelisted(&token1.address);

        Ok(match (whitelisted0, whitelisted1) {
            (true, true) => amount0 * &price0 + amount1 * &price1,
            (true, false) => amount0 * &price0 * BigDecimal::from(2),
            (false, true) => amount1 * &price1 * BigDecimal::from(2),
            (false, false) => BigDecimal::zero(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::fixtures::*;
    use super::*;
    use crate::config::PricingSettings;

    const PAIR: &str = "0x00000000000000000000000000000000000c0001";

    fn resolver() -> PriceResolver {
        PriceResolver::new(settings())
    }

    /// Established pair (enough providers to skip the new-pair gate)
    fn established(token0: &str, token1: &str) -> Pair {
        let mut pair = pair(PAIR, token0, token1, "1000", "1000", "1000");
        pair.liquidity_provider_count = 10;
        pair
    }

    #[test]
    fn test_both_whitelisted_volume_is_average() {
        let dai = token(DAI, Some("0.5"));
        let usdc = token(USDC, Some("0.25"));
        let pair = established(DAI, USDC);
        let eth_price = dec("4");

        // price0 = 2, price1 = 1 → (10 × 2 + 30 × 1) / 2
        let volume = resolver()
            .tracked_volume_usd(&dec("10"), &dai, &dec("30"), &usdc, &pair, &eth_price)
            .unwrap();
        assert_eq!(volume, dec("25"));
    }

    #[test]
    fn test_volume_to_liquidity_ratio_is_two() {
        let dai = token(DAI, Some("0.37"));
        let native = token(WRAPPED_NATIVE, Some("1"));
        let pair = established(DAI, WRAPPED_NATIVE);
        let eth_price = dec("2.5");
        let (amount0, amount1) = (dec("12.5"), dec("3.1"));

        let resolver = resolver();
        let volume = resolver
            .tracked_volume_usd(&amount0, &dai, &amount1, &native, &pair, &eth_price)
            .unwrap();
        let liquidity = resolver
            .tracked_liquidity_usd(&amount0, &dai, &amount1, &native, &eth_price)
            .unwrap();

        assert!(!volume.is_zero());
        assert_eq!(liquidity, volume * BigDecimal::from(2));
    }

    #[test]
    fn test_single_whitelisted_side_is_authoritative() {
        let other = token(TOKEN_A, Some("1000"));
        let native = token(WRAPPED_NATIVE, Some("1"));
        let eth_price = dec("3");
        let resolver = resolver();

        // Whitelisted token1
        let pair = established(TOKEN_A, WRAPPED_NATIVE);
        let volume = resolver
            .tracked_volume_usd(&dec("1"), &other, &dec("2"), &native, &pair, &eth_price)
            .unwrap();
        assert_eq!(volume, dec("6"));
        let liquidity = resolver
            .tracked_liquidity_usd(&dec("1"), &other, &dec("2"), &native, &eth_price)
            .unwrap();
        assert_eq!(liquidity, dec("12"));

        // Whitelisted token0
        let pair = established(WRAPPED_NATIVE, TOKEN_A);
        let volume = resolver
            .tracked_volume_usd(&dec("2"), &native, &dec("1"), &other, &pair, &eth_price)
            .unwrap();
        assert_eq!(volume, dec("6"));
        let liquidity = resolver
            .tracked_liquidity_usd(&dec("2"), &native, &dec("1"), &other, &eth_price)
            .unwrap();
        assert_eq!(liquidity, dec("12"));
    }

    #[test]
    fn test_neither_whitelisted_is_zero() {
        let a = token(TOKEN_A, Some("5"));
        let b = token(TOKEN_B, Some("7"));
        let pair = established(TOKEN_A, TOKEN_B);
        let resolver = resolver();

        let volume = resolver
            .tracked_volume_usd(&dec("100"), &a, &dec("100"), &b, &pair, &dec("10"))
            .unwrap();
        assert!(volume.is_zero());
        let liquidity = resolver
            .tracked_liquidity_usd(&dec("100"), &a, &dec("100"), &b, &dec("10"))
            .unwrap();
        assert!(liquidity.is_zero());
    }

    #[test]
    fn test_untracked_pair_is_zero() {
        let settings = PricingSettings {
            untracked_pairs: vec![PAIR.to_string()],
            ..PricingSettings::default()
        };
        let resolver = PriceResolver::new(Arc::new(settings));
        // Unpriced tokens would otherwise fail: the override comes first
        let dai = token(DAI, None);
        let usdc = token(USDC, None);
        let pair = established(DAI, USDC);

        let volume = resolver
            .tracked_volume_usd(&dec("1000000"), &dai, &dec("1000000"), &usdc, &pair, &dec("1"))
            .unwrap();
        assert!(volume.is_zero());
    }

    #[test]
    fn test_new_pair_below_usd_threshold_is_zero() {
        let dai = token(DAI, Some("1"));
        let usdc = token(USDC, Some("1"));
        // One provider, 250 + 250 reserves at $1 → $500 combined
        let mut pair = pair(PAIR, DAI, USDC, "250", "250", "500");
        pair.liquidity_provider_count = 1;

        let volume = resolver()
            .tracked_volume_usd(&dec("10"), &dai, &dec("10"), &usdc, &pair, &dec("1"))
            .unwrap();
        assert!(volume.is_zero());
    }

    #[test]
    fn test_new_pair_at_usd_threshold_counts() {
        let dai = token(DAI, Some("1"));
        let usdc = token(USDC, Some("1"));
        let mut pair = pair(PAIR, DAI, USDC, "500", "500", "1000");
        pair.liquidity_provider_count = 4;

        let volume = resolver()
            .tracked_volume_usd(&dec("10"), &dai, &dec("20"), &usdc, &pair, &dec("1"))
            .unwrap();
        assert_eq!(volume, dec("15"));
    }

    #[test]
    fn test_new_pair_single_whitelisted_doubles_reserve() {
        let native = token(WRAPPED_NATIVE, Some("1"));
        let other = token(TOKEN_A, Some("1"));
        let resolver = resolver();

        // 499 native at $1, doubled → 998 < 1000
        let mut thin = pair(PAIR, WRAPPED_NATIVE, TOKEN_A, "499", "1000000", "998");
        thin.liquidity_provider_count = 1;
        let volume = resolver
            .tracked_volume_usd(&dec("5"), &native, &dec("5"), &other, &thin, &dec("1"))
            .unwrap();
        assert!(volume.is_zero());

        // 500 native doubled → 1000, passes
        let mut enough = pair(PAIR, WRAPPED_NATIVE, TOKEN_A, "500", "1", "1000");
        enough.liquidity_provider_count = 1;
        let volume = resolver
            .tracked_volume_usd(&dec("5"), &native, &dec("5"), &other, &enough, &dec("1"))
            .unwrap();
        assert_eq!(volume, dec("5"));
    }

    #[test]
    fn test_new_pair_whitelisted_token1_doubles_reserve() {
        let other = token(TOKEN_A, Some("1"));
        let native = token(WRAPPED_NATIVE, Some("1"));
        let resolver = resolver();

        // 499 native on the token1 side, doubled → 998 < 1000
        let mut thin = pair(PAIR, TOKEN_A, WRAPPED_NATIVE, "1000000", "499", "998");
        thin.liquidity_provider_count = 1;
        let volume = resolver
            .tracked_volume_usd(&dec("5"), &other, &dec("5"), &native, &thin, &dec("1"))
            .unwrap();
        assert!(volume.is_zero());

        let mut enough = pair(PAIR, TOKEN_A, WRAPPED_NATIVE, "1", "500", "1000");
        enough.liquidity_provider_count = 1;
        let volume = resolver
            .tracked_volume_usd(&dec("5"), &other, &dec("7"), &native, &enough, &dec("1"))
            .unwrap();
        assert_eq!(volume, dec("7"));
    }

    #[test]
    fn test_unpriced_token_is_an_error() {
        let dai = token(DAI, Some("1"));
        let unpriced = token(TOKEN_A, None);
        let pair = established(DAI, TOKEN_A);

        let err = resolver()
            .tracked_liquidity_usd(&dec("1"), &dai, &dec("1"), &unpriced, &dec("1"))
            .unwrap_err();
        assert!(matches!(err, PricingError::UnpricedToken(address) if address == TOKEN_A));

        let err = resolver()
            .tracked_volume_usd(&dec("1"), &dai, &dec("1"), &unpriced, &pair, &dec("1"))
            .unwrap_err();
        assert!(matches!(err, PricingError::UnpricedToken(_)));
    }
}
