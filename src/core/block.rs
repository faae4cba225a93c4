use crate::core::{Hasher, Transaction};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Proof carried by every genesis block
pub const GENESIS_PROOF: u64 = 100;
/// Stand-in for the hash of the (nonexistent) block before genesis
pub const GENESIS_PREVIOUS_HASH: &str = "1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: f64, // seconds since the Unix epoch
    transactions: Vec<Transaction>,
    proof: u64,
    previous_hash: String,
}

impl Block {
    pub fn new(
        index: u64,
        timestamp: f64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Block {
        Block {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        }
    }

    pub fn genesis(timestamp: f64) -> Block {
        Block::new(
            1,
            timestamp,
            Vec::new(),
            GENESIS_PROOF,
            String::from(GENESIS_PREVIOUS_HASH),
        )
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_proof(&self) -> u64 {
        self.proof
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    /// Canonical SHA-256 of this block, see [`Hasher::hash`]
    pub fn hash(&self) -> Result<String> {
        Hasher::hash(self)
    }
}
