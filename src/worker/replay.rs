//! JSON Lines replay of exported chain logs.
//!
//! Each non-empty line is one [`ReplayEntry`]:
//!
//! ```text
//! {"type":"token","address":"0x04068d…","symbol":"USDC","name":"USD Coin","decimals":6}
//! {"type":"log","address":"0x2b4c76…","topics":["0x1c411e9a…"],"data":"0x…","block_number":5,"log_index":1}
//! ```
//!
//! Logs are applied in file order, which must already be chain order.

use std::io::BufRead;

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    db::{models::Token, EntityStore},
    worker::{
        parser::{parse_log, RawLog},
        processor::Processor,
    },
};

/// Lines between progress logs
const PROGRESS_INTERVAL: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayEntry {
    /// Token metadata, expected before the token's first pair
    Token {
        address: String,
        symbol: String,
        name: String,
        decimals: u8,
    },
    Log(RawLog),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub lines_read: u64,
    pub logs_applied: u64,
    /// Undecodable logs and logs of pairs never created
    pub logs_skipped: u64,
}

/// Feed every entry of `reader` through `processor`.
///
/// Stops at the first malformed line or processing failure; the error names
/// the offending line.
pub fn replay<R, S>(reader: R, processor: &mut Processor<S>) -> anyhow::Result<ReplaySummary>
where
    R: BufRead,
    S: EntityStore,
{
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_number))?;
        summary.lines_read += 1;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let entry: ReplayEntry = serde_json::from_str(line)
            .with_context(|| format!("Malformed entry on line {}", line_number))?;

        match entry {
            ReplayEntry::Token { address, symbol, name, decimals } => {
                processor
                    .register_token(Token::new(address, symbol, name, decimals))
                    .with_context(|| format!("Failed to register token on line {}", line_number))?;
            },
            ReplayEntry::Log(raw) => {
                let Some(parsed) = parse_log(&raw) else {
                    debug!(
                        "Skipping undecodable log at block {} index {}",
                        raw.block_number, raw.log_index
                    );
                    summary.logs_skipped += 1;
                    continue;
                };

                let applied = processor
                    .process(&parsed)
                    .with_context(|| format!("Failed to process log on line {}", line_number))?;
                if applied {
                    summary.logs_applied += 1;
                } else {
                    summary.logs_skipped += 1;
                }
            },
        }

        if summary.lines_read % PROGRESS_INTERVAL == 0 {
            info!(
                "Replayed {} lines ({} logs applied)",
                summary.lines_read, summary.logs_applied
            );
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, str::FromStr, sync::Arc};

    use alloy::{
        primitives::{Address, Uint, B256, U256},
        sol_types::SolEvent,
    };
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::{
        abis::v2,
        config::{PricingSettings, USDC, USDC_NATIVE_PAIR, WRAPPED_NATIVE},
        db::{models::BUNDLE_ID, MemoryStore},
    };

    const FACTORY: &str = "0x152ee697f2e276fa89e96742e9bb9ab1f2e61be3";

    fn addr(value: &str) -> Address {
        Address::from_str(value).unwrap()
    }

    fn processor() -> Processor<MemoryStore> {
        Processor::new(MemoryStore::new(), Arc::new(PricingSettings::default()))
    }

    fn log_line<E: SolEvent>(emitter: &str, event: &E, block_number: u64, log_index: u32) -> String {
        let raw = RawLog::from_log_data(addr(emitter), event.encode_log_data(), block_number, log_index);
        serde_json::to_string(&ReplayEntry::Log(raw)).unwrap()
    }

    fn sync_line(block_number: u64) -> String {
        let sync = v2::Sync {
            reserve0: Uint::from(2_000_000_000_000u128),
            reserve1: Uint::from(1_000_000_000_000_000_000_000u128),
        };
        log_line(USDC_NATIVE_PAIR, &sync, block_number, 0)
    }

    fn reference_pair_input() -> String {
        let created = v2::PairCreated {
            token0: addr(USDC),
            token1: addr(WRAPPED_NATIVE),
            pair: addr(USDC_NATIVE_PAIR),
            _3: U256::from(1u64),
        };

        [
            format!(
                r#"{{"type":"token","address":"{}","symbol":"USDC","name":"USD Coin","decimals":6}}"#,
                USDC
            ),
            format!(
                r#"{{"type":"token","address":"{}","symbol":"WFTM","name":"Wrapped Fantom","decimals":18}}"#,
                WRAPPED_NATIVE
            ),
            String::new(),
            log_line(FACTORY, &created, 1, 0),
            sync_line(2),
            sync_line(3),
        ]
        .join("\n")
    }

    #[test]
    fn test_replay_prices_reference_pair() {
        let mut processor = processor();
        let summary = replay(Cursor::new(reference_pair_input()), &mut processor).unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                lines_read: 6,
                logs_applied: 3,
                logs_skipped: 0,
            }
        );

        let store = processor.into_store();
        let bundle = store.load_bundle(BUNDLE_ID).unwrap().unwrap();
        assert_eq!(bundle.eth_price, BigDecimal::from(2000));
        assert_eq!(store.load_token(USDC).unwrap().unwrap().decimals, 6);
    }

    #[test]
    fn test_undecodable_and_unknown_pair_logs_are_skipped() {
        let unknown_topic = RawLog {
            address: addr(USDC_NATIVE_PAIR),
            topics: vec![B256::repeat_byte(0xab)],
            data: Default::default(),
            block_number: 1,
            log_index: 0,
        };
        let input = [
            serde_json::to_string(&ReplayEntry::Log(unknown_topic)).unwrap(),
            // Pair never created
            sync_line(2),
        ]
        .join("\n");

        let mut processor = processor();
        let summary = replay(Cursor::new(input), &mut processor).unwrap();
        assert_eq!(summary.logs_applied, 0);
        assert_eq!(summary.logs_skipped, 2);
    }

    #[test]
    fn test_out_of_order_input_fails() {
        let input = format!("{}\n{}\n{}", reference_pair_input(), sync_line(3), sync_line(4));

        let mut processor = processor();
        let err = replay(Cursor::new(input), &mut processor).unwrap_err();
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_malformed_line_fails() {
        let input = format!("{}\nnot json", reference_pair_input());

        let mut processor = processor();
        let err = replay(Cursor::new(input), &mut processor).unwrap_err();
        assert!(err.to_string().contains("Malformed entry on line 7"));
    }
}
