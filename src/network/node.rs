use crate::error::{LedgerError, Result};
use log::info;
use std::collections::BTreeSet;
use url::Url;

/// Known peers, stored by network location (`host` or `host:port`).
///
/// Kept sorted so every walk over the peers happens in the same order.
/// Peers are never removed.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> NodeRegistry {
        NodeRegistry::default()
    }

    /// Register a peer given as a URL and return its stored network location
    pub fn register(&mut self, address: &str) -> Result<String> {
        let location = network_location(address)?;
        if self.nodes.insert(location.clone()) {
            info!("Registered peer {location}");
        }
        Ok(location)
    }

    /// Register every address or, if any of them is invalid, none
    pub fn register_all(&mut self, addresses: &[String]) -> Result<()> {
        let locations = addresses
            .iter()
            .map(|address| network_location(address))
            .collect::<Result<Vec<_>>>()?;
        for location in locations {
            if self.nodes.insert(location.clone()) {
                info!("Registered peer {location}");
            }
        }
        Ok(())
    }

    pub fn addresses(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    pub fn contains(&self, location: &str) -> bool {
        self.nodes.contains(location)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Port assumed for a peer stored without one, the `http://` default
pub const DEFAULT_PEER_PORT: u16 = 80;

/// Reduce `address` to `host[:port]`.
///
/// `"http://192.168.0.5:5000/chain"` becomes `"192.168.0.5:5000"`. Input
/// without a scheme is read as `http://`. A port written in the input is
/// kept even when it is the scheme default.
pub fn network_location(address: &str) -> Result<String> {
    let address = address.trim();
    // "localhost:5000" would otherwise parse as scheme "localhost"
    let candidate = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };
    let url = Url::parse(&candidate)
        .map_err(|e| LedgerError::InvalidAddress(format!("{address}: {e}")))?;

    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| LedgerError::InvalidAddress(format!("{address}: missing host")))?;

    // The parser forgets default ports, so fall back to what was written
    Ok(match url.port().or_else(|| written_port(&candidate)) {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Socket address to dial for a stored network location
pub fn dial_address(location: &str) -> String {
    match split_port(location) {
        Some(_) => location.to_string(),
        None => format!("{location}:{DEFAULT_PEER_PORT}"),
    }
}

fn written_port(url: &str) -> Option<u16> {
    let rest = url.split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
    split_port(host_port).map(|(_, port)| port)
}

// "[::1]:80" and "host:80" carry a port, "[::1]" and "host" do not
fn split_port(host_port: &str) -> Option<(&str, u16)> {
    let (host, port) = host_port.rsplit_once(':')?;
    if host.ends_with(']') || !host.contains(':') {
        port.parse().ok().map(|port| (host, port))
    } else {
        None
    }
}
