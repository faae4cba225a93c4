use crate::core::{ChainFetcher, ChainResponse};
use crate::error::{LedgerError, Result};
use crate::network::{dial_address, Package};
use log::debug;
use std::io::{BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Send one request to a node and wait for its single reply.
///
/// `addr` is a network location such as `127.0.0.1:5000` or `node:5000`;
/// a bare host is dialled on [`crate::network::DEFAULT_PEER_PORT`].
pub fn send_request(addr: &str, pkg: &Package, timeout: Duration) -> Result<Package> {
    let socket_addr = dial_address(addr)
        .to_socket_addrs()
        .map_err(|e| LedgerError::Network(format!("Invalid address {addr}: {e}")))?
        .next()
        .ok_or_else(|| LedgerError::Network(format!("Address {addr} resolved to nothing")))?;

    debug!("Sending package to {addr}: {pkg:?}");

    let mut stream = TcpStream::connect_timeout(&socket_addr, timeout)
        .map_err(|e| LedgerError::Network(format!("Failed to connect to {addr}: {e}")))?;
    stream
        .set_write_timeout(Some(timeout))
        .map_err(|e| LedgerError::Network(format!("Failed to set write timeout: {e}")))?;
    stream
        .set_read_timeout(Some(timeout))
        .map_err(|e| LedgerError::Network(format!("Failed to set read timeout: {e}")))?;

    serde_json::to_writer(&stream, pkg)
        .map_err(|e| LedgerError::Network(format!("Failed to send data to {addr}: {e}")))?;
    stream.flush()?;
    stream.shutdown(Shutdown::Write)?;

    serde_json::from_reader(BufReader::new(&stream))
        .map_err(|e| LedgerError::Network(format!("Malformed reply from {addr}: {e}")))
}

/// Fetches peer chains over the node's own TCP protocol
#[derive(Debug, Clone)]
pub struct TcpChainFetcher {
    timeout: Duration,
}

impl TcpChainFetcher {
    pub fn new(timeout: Duration) -> TcpChainFetcher {
        TcpChainFetcher { timeout }
    }
}

impl ChainFetcher for TcpChainFetcher {
    fn fetch_chain(&self, peer: &str) -> Result<ChainResponse> {
        match send_request(peer, &Package::GetChain, self.timeout)? {
            Package::Chain { length, chain } => Ok(ChainResponse { length, chain }),
            Package::Error { message } => Err(LedgerError::Network(format!(
                "Peer {peer} answered with an error: {message}"
            ))),
            other => Err(LedgerError::Network(format!(
                "Peer {peer} sent unexpected reply: {other:?}"
            ))),
        }
    }
}
