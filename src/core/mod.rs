//! Core ledger functionality
//!
//! This module contains the ledger engine: blocks and transactions,
//! deterministic hashing, proof-of-work, chain validation, mining and
//! longest-chain consensus.

pub mod block;
pub mod consensus;
pub mod hasher;
pub mod ledger;
pub mod miner;
pub mod proof_of_work;
pub mod transaction;
pub mod validator;

pub use block::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use consensus::{ChainFetcher, ChainResponse, ConsensusResolver};
pub use hasher::Hasher;
pub use ledger::Ledger;
pub use miner::{Miner, MINING_REWARD, MINING_REWARD_SENDER};
pub use proof_of_work::{CancelToken, ProofOfWork, DIFFICULTY_PREFIX};
pub use transaction::Transaction;
pub use validator::ChainValidator;
