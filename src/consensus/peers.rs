use std::collections::HashSet;

use url::Url;

use crate::error::{LedgerError, Result};

/// Known peers as `host[:port]`, deduplicated.
#[derive(Debug, Default, Clone)]
pub struct PeerSet {
    peers: HashSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `address` and add it. Returns `false` if it was already known.
    pub fn register(&mut self, address: &str) -> Result<bool> {
        let peer = parse_peer(address)?;
        Ok(self.insert(peer))
    }

    /// Add an address already reduced by [`parse_peer`].
    pub fn insert(&mut self, peer: String) -> bool {
        self.peers.insert(peer)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Snapshot of all peers, sorted for stable output.
    pub fn addresses(&self) -> Vec<String> {
        let mut all: Vec<String> = self.peers.iter().cloned().collect();
        all.sort();
        all
    }
}

/// Reduce a peer URL to its network location.
///
/// Accepts `http://host:port/anything`, `host:port` and bare hosts.
pub fn parse_peer(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidPeer(address.to_string()));
    }

    // `host:port` would otherwise parse as scheme `host`
    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    };
    let url = parsed.map_err(|_| LedgerError::InvalidPeer(address.to_string()))?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LedgerError::InvalidPeer(address.to_string()))?;

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
