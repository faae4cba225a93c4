//! Shared fixtures for unit tests: prebuilt chains, tampering helpers and
//! an in-memory peer fetcher.

pub mod test_utils;

pub use test_utils::*;
