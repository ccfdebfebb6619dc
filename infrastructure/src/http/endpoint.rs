//! Peer addressing: maps peer ids to acceptor base URLs

use super::error::{HttpError, Result};
use crate::config::FileTransportConfig;
use paxos_domain::PeerId;

pub const PREPARE_PATH: &str = "/api/paxos/prepare";
pub const ACCEPT_PATH: &str = "/api/paxos/accept";
pub const STATE_PATH: &str = "/api/paxos/state";

/// Peer `p` listens at `{scheme}://{host}:{base_port + p - 1}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddressing {
    scheme: String,
    host: String,
    base_port: u16,
}

impl PeerAddressing {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, base_port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            base_port,
        }
    }

    pub fn from_config(transport: &FileTransportConfig) -> Self {
        Self::new(&transport.scheme, &transport.host, transport.base_port)
    }

    /// Port of `peer`, or `None` when it falls outside the u16 range
    pub fn port(&self, peer: PeerId) -> Option<u16> {
        let offset = u16::try_from(peer.value().checked_sub(1)?).ok()?;
        self.base_port.checked_add(offset)
    }

    pub fn base_url(&self, peer: PeerId) -> Option<String> {
        self.port(peer)
            .map(|port| format!("{}://{}:{}", self.scheme, self.host, port))
    }

    /// Full URL of `path` on `peer`
    pub fn url(&self, peer: PeerId, path: &str) -> Result<reqwest::Url> {
        let base = self.base_url(peer).ok_or_else(|| HttpError::InvalidUrl {
            url: format!("peer {}", peer),
            reason: format!("no port for peer {} with base port {}", peer, self.base_port),
        })?;
        let raw = format!("{}{}", base, path);
        reqwest::Url::parse(&raw).map_err(|e| HttpError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}

impl Default for PeerAddressing {
    fn default() -> Self {
        Self::from_config(&FileTransportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_addressing_starts_at_8081() {
        let addressing = PeerAddressing::default();
        assert_eq!(
            addressing.base_url(PeerId::new(1)).unwrap(),
            "http://localhost:8081"
        );
        assert_eq!(
            addressing.base_url(PeerId::new(3)).unwrap(),
            "http://localhost:8083"
        );
    }

    #[test]
    fn test_url_includes_path() {
        let addressing = PeerAddressing::new("http", "10.0.0.1", 9000);
        let url = addressing.url(PeerId::new(2), PREPARE_PATH).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.1:9001/api/paxos/prepare");
    }

    #[test]
    fn test_port_overflow_and_zero_peer() {
        let addressing = PeerAddressing::new("http", "localhost", 65535);
        assert_eq!(addressing.port(PeerId::new(1)), Some(65535));
        assert_eq!(addressing.port(PeerId::new(2)), None);
        assert_eq!(addressing.port(PeerId::new(0)), None);
        assert!(addressing.url(PeerId::new(2), STATE_PATH).is_err());
    }
}
