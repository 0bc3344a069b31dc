use rustc_hash::FxHashMap;
use serde::Serialize;

use super::{
    models::{Bundle, Factory, LiquidityEvent, Pair, Token, BUNDLE_ID},
    EntityStore,
};

/// In-process entity store backed by hash maps.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pairs: FxHashMap<String, Pair>,
    tokens: FxHashMap<String, Token>,
    bundles: FxHashMap<String, Bundle>,
    factory: Option<Factory>,
    liquidity_events: Vec<LiquidityEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Mints and burns in the order they were saved
    pub fn liquidity_events(&self) -> &[LiquidityEvent] {
        &self.liquidity_events
    }

    /// Borrowed view of every entity, pairs and tokens sorted by address.
    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        let mut pairs: Vec<&Pair> = self.pairs().collect();
        pairs.sort_by(|a, b| a.address.cmp(&b.address));

        let mut tokens: Vec<&Token> = self.tokens().collect();
        tokens.sort_by(|a, b| a.address.cmp(&b.address));

        StoreSnapshot {
            bundle: self.bundles.get(BUNDLE_ID),
            factory: self.factory.as_ref(),
            pairs,
            tokens,
            liquidity_events: &self.liquidity_events,
        }
    }
}

/// Serializable dump of a [`MemoryStore`].
#[derive(Debug, Serialize)]
pub struct StoreSnapshot<'a> {
    pub bundle: Option<&'a Bundle>,
    pub factory: Option<&'a Factory>,
    pub pairs: Vec<&'a Pair>,
    pub tokens: Vec<&'a Token>,
    pub liquidity_events: &'a [LiquidityEvent],
}

impl EntityStore for MemoryStore {
    fn load_pair(&self, address: &str) -> anyhow::Result<Option<Pair>> {
        Ok(self.pairs.get(address).cloned())
    }

    fn load_token(&self, address: &str) -> anyhow::Result<Option<Token>> {
        Ok(self.tokens.get(address).cloned())
    }

    fn load_bundle(&self, id: &str) -> anyhow::Result<Option<Bundle>> {
        Ok(self.bundles.get(id).cloned())
    }

    fn load_factory(&self) -> anyhow::Result<Option<Factory>> {
        Ok(self.factory.clone())
    }

    fn save_pair(&mut self, pair: Pair) -> anyhow::Result<()> {
        self.pairs.insert(pair.address.clone(), pair);
        Ok(())
    }

    fn save_token(&mut self, token: Token) -> anyhow::Result<()> {
        self.tokens.insert(token.address.clone(), token);
        Ok(())
    }

    fn save_bundle(&mut self, bundle: Bundle) -> anyhow::Result<()> {
        self.bundles.insert(bundle.id.clone(), bundle);
        Ok(())
    }

    fn save_factory(&mut self, factory: Factory) -> anyhow::Result<()> {
        self.factory = Some(factory);
        Ok(())
    }

    fn save_liquidity_event(&mut self, event: LiquidityEvent) -> anyhow::Result<()> {
        self.liquidity_events.push(event);
        Ok(())
    }
}
