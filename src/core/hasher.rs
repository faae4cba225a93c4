//! Deterministic block hashing
//!
//! A block is encoded with [`to_canonical_json`] (keys sorted at every
//! level, fixed separators, ASCII-only strings) and the bytes are run
//! through SHA-256. Validators recompute this digest and compare it against
//! stored `previous_hash` values, so the encoding must never change.

use crate::core::Block;
use crate::error::Result;
use crate::utils::{sha256_hex, to_canonical_json};

pub struct Hasher;

impl Hasher {
    /// The exact byte string that gets hashed for `block`
    pub fn canonical_bytes(block: &Block) -> Result<Vec<u8>> {
        to_canonical_json(block)
    }

    /// 64-character lowercase hex SHA-256 of the canonical encoding
    pub fn hash(block: &Block) -> Result<String> {
        let bytes = Self::canonical_bytes(block)?;
        Ok(sha256_hex(&bytes))
    }
}
