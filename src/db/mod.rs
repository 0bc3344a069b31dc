//! Entity storage.
//!
//! The pricing core only reads through [`EntityStore`]; the event processor is
//! the single writer. [`MemoryStore`] keeps everything in process.

pub mod memory;
pub mod models;

pub use memory::{MemoryStore, StoreSnapshot};

use models::{Bundle, Factory, LiquidityEvent, Pair, Token};

/// Load/save access to indexed entities.
///
/// Loads return owned snapshots. `Ok(None)` means the record does not exist;
/// `Err` is a failure of the backing store itself and must be propagated.
pub trait EntityStore {
    fn load_pair(&self, address: &str) -> anyhow::Result<Option<Pair>>;
    fn load_token(&self, address: &str) -> anyhow::Result<Option<Token>>;
    fn load_bundle(&self, id: &str) -> anyhow::Result<Option<Bundle>>;
    fn load_factory(&self) -> anyhow::Result<Option<Factory>>;

    fn save_pair(&mut self, pair: Pair) -> anyhow::Result<()>;
    fn save_token(&mut self, token: Token) -> anyhow::Result<()>;
    fn save_bundle(&mut self, bundle: Bundle) -> anyhow::Result<()>;
    fn save_factory(&mut self, factory: Factory) -> anyhow::Result<()>;
    fn save_liquidity_event(&mut self, event: LiquidityEvent) -> anyhow::Result<()>;
}
