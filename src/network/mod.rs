//! Node networking
//!
//! This module holds the peer registry, the JSON-over-TCP node protocol
//! and its server, and the client side used both by the CLI and by
//! consensus to fetch peer chains.

pub mod client;
pub mod node;
pub mod server;

pub use client::{send_request, TcpChainFetcher};
pub use node::{dial_address, network_location, NodeRegistry, DEFAULT_PEER_PORT};
pub use server::{NodeState, Package, Server};
