//! Acceptor Gateway port
//!
//! Defines the interface for sending Paxos requests to acceptors.

use async_trait::async_trait;
use paxos_domain::{AcceptResponse, AcceptorState, PeerId, PrepareResponse, ProposalId};
use thiserror::Error;

/// Errors that can occur while talking to one acceptor
///
/// Use cases never propagate these: a failed request is recorded as an
/// absent response for that peer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Acceptor returned HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Unknown peer: {0}")]
    UnknownPeer(PeerId),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for acceptor communication
///
/// This port defines how the application layer reaches acceptors.
/// Implementations (adapters) live in the infrastructure layer. One call is
/// one request: implementations must not retry.
#[async_trait]
pub trait AcceptorGateway: Send + Sync {
    /// Send a Prepare request; returns a promise or a refusal
    async fn prepare(
        &self,
        peer: PeerId,
        proposal_id: ProposalId,
    ) -> Result<PrepareResponse, GatewayError>;

    /// Send an Accept request for `value`
    async fn accept(
        &self,
        peer: PeerId,
        proposal_id: ProposalId,
        value: &str,
    ) -> Result<AcceptResponse, GatewayError>;

    /// Read the acceptor's promised/accepted state
    async fn state(&self, peer: PeerId) -> Result<AcceptorState, GatewayError>;
}
