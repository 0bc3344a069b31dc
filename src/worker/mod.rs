//! Event ingestion: decoding raw logs and applying them in chain order.

pub mod parser;
pub mod processor;
pub mod replay;

pub use parser::{parse_log, ParsedLog, RawLog};
pub use processor::Processor;
pub use replay::{replay, ReplayEntry, ReplaySummary};
