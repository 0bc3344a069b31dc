//! Shared builders for pricing tests.

use std::{str::FromStr, sync::Arc};

use bigdecimal::BigDecimal;

use crate::{
    config::PricingSettings,
    db::{
        models::{Pair, Token},
        EntityStore, MemoryStore,
    },
};

pub(crate) use crate::config::{
    DAI, DAI_NATIVE_PAIR, FACTORY, USDC, USDC_NATIVE_PAIR, USDT, USDT_NATIVE_PAIR, WRAPPED_NATIVE,
};

pub const TOKEN_A: &str = "0x00000000000000000000000000000000000000a1";
pub const TOKEN_B: &str = "0x00000000000000000000000000000000000000b2";

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

pub fn settings() -> Arc<PricingSettings> {
    Arc::new(PricingSettings::default())
}

pub fn token(address: &str, derived_eth: Option<&str>) -> Token {
    let mut token = Token::new(address.to_string(), "TKN".to_string(), "Token".to_string(), 18);
    if let Some(derived) = derived_eth {
        token.set_derived_eth(dec(derived), 1);
    }
    token
}

/// Pair with the given reserves and native-asset liquidity.
pub fn pair(
    address: &str,
    token0: &str,
    token1: &str,
    reserve0: &str,
    reserve1: &str,
    reserve_eth: &str,
) -> Pair {
    let mut pair = Pair::new(address.to_string(), token0.to_string(), token1.to_string(), 1);
    pair.set_reserves(dec(reserve0), dec(reserve1));
    pair.reserve_eth = dec(reserve_eth);
    pair
}

/// Native/stable reference pair quoting `price` USD per native asset, with
/// `native_reserve` native on one side. The stablecoin is token0 when
/// `stable_first` is set.
pub fn reference_pair(
    address: &str,
    stable: &str,
    stable_first: bool,
    price: &str,
    native_reserve: &str,
    reserve_eth: &str,
) -> Pair {
    let stable_reserve = (dec(price) * dec(native_reserve)).to_string();
    if stable_first {
        pair(address, stable, WRAPPED_NATIVE, &stable_reserve, native_reserve, reserve_eth)
    } else {
        pair(address, WRAPPED_NATIVE, stable, native_reserve, &stable_reserve, reserve_eth)
    }
}

pub fn store_with(pairs: Vec<Pair>, tokens: Vec<Token>) -> MemoryStore {
    let mut store = MemoryStore::new();
    for pair in pairs {
        store.save_pair(pair).unwrap();
    }
    for token in tokens {
        store.save_token(token).unwrap();
    }
    store
}
