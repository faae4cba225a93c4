//! # Ledger Node - A Minimal Proof-of-Work Ledger
//!
//! A small distributed ledger: every node keeps an append-only chain of
//! blocks, each sealing the transactions that were pending when it was
//! mined, linked by SHA-256 and protected by a proof-of-work puzzle. Nodes
//! converge by adopting the longest valid chain among their peers.
//!
//! ## How the Code Is Organized
//! - `core/`: blocks, canonical hashing, proof-of-work, the ledger, chain
//!   validation, mining and consensus
//! - `network/`: peer registry, the JSON-over-TCP node protocol, server
//!   and client
//! - `config/`: node address, identifier and timeouts
//! - `utils/`: SHA-256, clock and canonical JSON helpers
//! - `cli/`: command-line interface for the binary
//!
//! ## Where to Start
//! 1. `core/ledger.rs` for how blocks get minted
//! 2. `core/hasher.rs` and `core/proof_of_work.rs` for the puzzle and linkage
//! 3. `core/consensus.rs` for how a node adopts a peer's chain
//! 4. `network/server.rs` for how requests reach the ledger

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use crate::core::{
    Block, CancelToken, ChainFetcher, ChainResponse, ChainValidator, ConsensusResolver, Hasher,
    Ledger, Miner, ProofOfWork, Transaction,
};
pub use error::{LedgerError, Result};
pub use network::{send_request, NodeRegistry, NodeState, Package, Server, TcpChainFetcher};
pub use utils::{current_timestamp, sha256_hex, to_canonical_json};
