use rustc_hash::FxHashMap;

use crate::utils::ZERO_ADDRESS;

/// Resolves the pair address for a token combination, like the factory's
/// `getPair(tokenA, tokenB)`.
///
/// Symmetric in its arguments. Returns [`ZERO_ADDRESS`] when no pair exists.
pub trait PairRegistry {
    fn get_pair(&self, token_a: &str, token_b: &str) -> anyhow::Result<String>;
}

/// Pair registry rebuilt from `PairCreated` events.
///
/// Holds the same mapping the factory contract stores on chain, so lookups are
/// deterministic for a given replay position.
#[derive(Debug, Default, Clone)]
pub struct PairIndex {
    pairs: FxHashMap<(String, String), String>,
}

impl PairIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token_a: &str, token_b: &str, pair: &str) {
        self.pairs.insert(Self::key(token_a, token_b), pair.to_lowercase());
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn key(token_a: &str, token_b: &str) -> (String, String) {
        let a = token_a.to_lowercase();
        let b = token_b.to_lowercase();
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl PairRegistry for PairIndex {
    fn get_pair(&self, token_a: &str, token_b: &str) -> anyhow::Result<String> {
        Ok(self
            .pairs
            .get(&Self::key(token_a, token_b))
            .cloned()
            .unwrap_or_else(|| ZERO_ADDRESS.to_string()))
    }
}
