//! Test utilities for ledger testing

use crate::core::{Block, ChainFetcher, ChainResponse, Ledger, GENESIS_PREVIOUS_HASH};
use crate::error::{LedgerError, Result};
use std::collections::HashMap;

/// Successive proofs starting from the genesis proof (100), so chains can
/// be built without running the search
pub const KNOWN_PROOFS: [u64; 7] = [35293, 35089, 119678, 146502, 43538, 85724, 51178];

pub const GENESIS_TIMESTAMP: f64 = 1_700_000_000.5;

/// Last proof whose smallest solution is 505886, so a search on top of it
/// runs long enough to be interrupted
pub const SLOW_LAST_PROOF: u64 = 64;

/// Ledger whose only block carries [`SLOW_LAST_PROOF`]
pub fn slow_ledger() -> Ledger {
    Ledger::with_genesis(Block::new(
        1,
        GENESIS_TIMESTAMP,
        Vec::new(),
        SLOW_LAST_PROOF,
        GENESIS_PREVIOUS_HASH.to_string(),
    ))
}

/// Ledger whose chain has `length` blocks, genesis included
pub fn ledger_with_blocks(length: usize) -> Ledger {
    tagged_ledger(length, "")
}

/// Like [`ledger_with_blocks`], but every minted block carries one
/// transaction mentioning `tag`, so equally long chains differ
pub fn tagged_ledger(length: usize, tag: &str) -> Ledger {
    assert!(
        (1..=KNOWN_PROOFS.len() + 1).contains(&length),
        "no precomputed proofs for length {length}"
    );
    let mut ledger = Ledger::with_genesis(Block::genesis(GENESIS_TIMESTAMP));
    for proof in KNOWN_PROOFS.iter().take(length - 1) {
        if !tag.is_empty() {
            ledger.submit_transaction(tag, "recipient", 1);
        }
        ledger.mint(*proof, None).unwrap();
    }
    ledger
}

pub fn with_previous_hash(block: &Block, previous_hash: &str) -> Block {
    Block::new(
        block.get_index(),
        block.get_timestamp(),
        block.get_transactions().to_vec(),
        block.get_proof(),
        previous_hash.to_string(),
    )
}

pub fn with_proof(block: &Block, proof: u64) -> Block {
    Block::new(
        block.get_index(),
        block.get_timestamp(),
        block.get_transactions().to_vec(),
        proof,
        block.get_previous_hash().to_string(),
    )
}

/// In-memory peers; any peer without a canned response is unreachable
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: HashMap<String, ChainResponse>,
}

impl MockFetcher {
    pub fn new() -> MockFetcher {
        MockFetcher::default()
    }

    pub fn with_chain(self, peer: &str, chain: &[Block]) -> MockFetcher {
        self.with_response(peer, ChainResponse::from_chain(chain))
    }

    pub fn with_response(mut self, peer: &str, response: ChainResponse) -> MockFetcher {
        self.responses.insert(peer.to_string(), response);
        self
    }
}

impl ChainFetcher for MockFetcher {
    fn fetch_chain(&self, peer: &str) -> Result<ChainResponse> {
        self.responses
            .get(peer)
            .cloned()
            .ok_or_else(|| LedgerError::Network(format!("{peer} is unreachable")))
    }
}
