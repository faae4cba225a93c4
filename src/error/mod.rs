//! Error handling for the ledger node
//!
//! Every fallible operation in the crate returns [`Result`], carrying one of
//! the [`LedgerError`] variants below.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger, consensus and node operations
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Proof does not satisfy the proof-of-work predicate against the tail
    InvalidProof { last_proof: u64, proof: u64 },
    /// Supplied previous hash does not match the hash of the tail block
    InvalidPreviousHash { expected: String, actual: String },
    /// A chain with zero blocks
    EmptyChain,
    /// Block at `index` (1-based position) does not link to its predecessor
    BrokenLink { index: usize },
    /// Block at `index` (1-based position) carries a proof that fails the predicate
    InvalidChainProof { index: usize },
    /// Peer address could not be parsed into a network location
    InvalidAddress(String),
    /// Network communication errors
    Network(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(String),
    /// A poisoned lock around shared node state
    Lock(String),
    /// Hashing or clock errors
    Crypto(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidProof { last_proof, proof } => {
                write!(f, "Invalid proof: {proof} does not solve last proof {last_proof}")
            }
            LedgerError::InvalidPreviousHash { expected, actual } => {
                write!(f, "Invalid previous hash: expected {expected}, got {actual}")
            }
            LedgerError::EmptyChain => write!(f, "Chain contains no blocks"),
            LedgerError::BrokenLink { index } => {
                write!(f, "Block {index} does not link to its predecessor")
            }
            LedgerError::InvalidChainProof { index } => {
                write!(f, "Block {index} carries an invalid proof of work")
            }
            LedgerError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
            LedgerError::Network(msg) => write!(f, "Network error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
            LedgerError::Lock(msg) => write!(f, "Lock error: {msg}"),
            LedgerError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for LedgerError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        LedgerError::Lock(err.to_string())
    }
}
