mod bundle;
mod factory;
mod liquidity_event;
mod pair;
mod token;

pub use bundle::{Bundle, BUNDLE_ID};
pub use factory::Factory;
pub use liquidity_event::{LiquidityEvent, LiquidityEventKind};
pub use pair::Pair;
pub use token::Token;
