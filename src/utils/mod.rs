//! Utility functions and helpers
//!
//! This module contains the hashing and clock helpers plus the canonical
//! JSON encoder that block hashing is built on.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, sha256_digest, sha256_hex};

pub use serialization::{to_canonical_json, CanonicalFormatter};
