pub mod transfer;
pub mod v2;

pub use transfer::Transfer;
pub use v2::{Burn, Mint, PairCreated, Swap, Sync};
