pub mod abis;
pub mod config;
pub mod db;
pub mod pricing;
pub mod utils;
pub mod worker;

pub use config::Settings;
pub use db::MemoryStore;
pub use pricing::PriceResolver;
pub use worker::{replay, Processor, ReplaySummary};
