//! Configuration management
//!
//! This module handles the node's settings: listen address, node
//! identifier and peer timeouts, read from an optional TOML file and
//! overridden by environment variables.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
