//! Domain error types

use super::ids::{PeerId, ProposalId};
use thiserror::Error;

/// Domain-level errors
///
/// Quorum failures are not errors: they are reported through
/// [`Verdict`](crate::paxos::verdict::Verdict).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Acceptor pool must contain at least one peer")]
    EmptyPool,

    #[error("At least one peer must be contacted")]
    NoPeersToContact,

    #[error("Contact count {requested} exceeds pool size {pool_size}")]
    ContactCountExceedsPool { requested: usize, pool_size: usize },

    #[error("Peer {peer} is outside the pool (valid ids: 1..={pool_size})")]
    PeerOutOfRange { peer: PeerId, pool_size: usize },

    #[error("Peer {0} listed more than once")]
    DuplicatePeer(PeerId),

    #[error(
        "Acceptors reported different values for accepted proposal {accepted_id}: \"{first}\" and \"{second}\""
    )]
    ConflictingAcceptedValues {
        accepted_id: ProposalId,
        first: String,
        second: String,
    },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    /// Check if this error was caused by invalid caller input
    ///
    /// Input errors are detected before any request is sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyPool
                | DomainError::NoPeersToContact
                | DomainError::ContactCountExceedsPool { .. }
                | DomainError::PeerOutOfRange { .. }
                | DomainError::DuplicatePeer(_)
        )
    }
}
