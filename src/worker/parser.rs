//! Log parsing module.
//!
//! Decodes raw logs into typed pair/factory events by topic0. Addresses are
//! lowercased hex so they can be used directly as entity keys.

use alloy::{
    primitives::{Address, Bytes, LogData, B256},
    sol_types::SolEvent,
};
use serde::{Deserialize, Serialize};

use crate::{
    abis::{transfer, v2},
    utils::hex_encode,
};

/// Raw log as emitted by the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: u64,
    pub log_index: u32,
}

impl RawLog {
    /// Wrap an encoded event emitted by `address`.
    pub fn from_log_data(address: Address, data: LogData, block_number: u64, log_index: u32) -> Self {
        let (topics, data) = data.split();
        Self {
            address,
            topics,
            data,
            block_number,
            log_index,
        }
    }
}

/// Pre-parsed log with the metadata needed for processing.
pub enum ParsedLog {
    PairCreated {
        event: v2::PairCreated,
        log_address: String,
        block_number: u64,
        log_index: u32,
    },
    // LP token transfers
    Transfer {
        event: transfer::Transfer,
        log_address: String,
        block_number: u64,
        log_index: u32,
    },
    Sync {
        event: v2::Sync,
        log_address: String,
        block_number: u64,
        log_index: u32,
    },
    Mint {
        event: v2::Mint,
        log_address: String,
        block_number: u64,
        log_index: u32,
    },
    Burn {
        event: v2::Burn,
        log_address: String,
        block_number: u64,
        log_index: u32,
    },
    Swap {
        event: v2::Swap,
        log_address: String,
        block_number: u64,
        log_index: u32,
    },
}

impl ParsedLog {
    /// (block number, log index), the causal order events must be applied in
    pub fn position(&self) -> (u64, u32) {
        match self {
            ParsedLog::PairCreated { block_number, log_index, .. }
            | ParsedLog::Transfer { block_number, log_index, .. }
            | ParsedLog::Sync { block_number, log_index, .. }
            | ParsedLog::Mint { block_number, log_index, .. }
            | ParsedLog::Burn { block_number, log_index, .. }
            | ParsedLog::Swap { block_number, log_index, .. } => (*block_number, *log_index),
        }
    }
}

/// Decode a raw log.
///
/// Returns None for logs without topics, unknown signatures, and logs whose
/// payload does not decode against the matching signature.
pub fn parse_log(log: &RawLog) -> Option<ParsedLog> {
    let log_data = LogData::new_unchecked(log.topics.clone(), log.data.clone());
    let topic0 = log_data.topics().first()?;

    let log_address = hex_encode(log.address.as_slice());
    let block_number = log.block_number;
    let log_index = log.log_index;

    match topic0 {
        t if t == &v2::PairCreated::SIGNATURE_HASH => v2::PairCreated::decode_log_data(&log_data)
            .ok()
            .map(|event| ParsedLog::PairCreated {
                event,
                log_address,
                block_number,
                log_index,
            }),
        t if t == &transfer::Transfer::SIGNATURE_HASH => {
            transfer::Transfer::decode_log_data(&log_data)
                .ok()
                .map(|event| ParsedLog::Transfer {
                    event,
                    log_address,
                    block_number,
                    log_index,
                })
        },
        t if t == &v2::Sync::SIGNATURE_HASH => {
            v2::Sync::decode_log_data(&log_data).ok().map(|event| ParsedLog::Sync {
                event,
                log_address,
                block_number,
                log_index,
            })
        },
        t if t == &v2::Mint::SIGNATURE_HASH => {
            v2::Mint::decode_log_data(&log_data).ok().map(|event| ParsedLog::Mint {
                event,
                log_address,
                block_number,
                log_index,
            })
        },
        t if t == &v2::Burn::SIGNATURE_HASH => {
            v2::Burn::decode_log_data(&log_data).ok().map(|event| ParsedLog::Burn {
                event,
                log_address,
                block_number,
                log_index,
            })
        },
        t if t == &v2::Swap::SIGNATURE_HASH => {
            v2::Swap::decode_log_data(&log_data).ok().map(|event| ParsedLog::Swap {
                event,
                log_address,
                block_number,
                log_index,
            })
        },
        _ => None,
    }
}
