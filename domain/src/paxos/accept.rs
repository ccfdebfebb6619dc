//! Accept-phase evaluation

use super::response::{AcceptResponse, ResponseSet};
use crate::cluster::PeerPool;
use crate::core::ids::PeerId;
use crate::quorum::QuorumProgress;
use serde::{Deserialize, Serialize};

/// Result of the Accept phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AcceptOutcome {
    /// A majority of the pool accepted the value
    Decided {
        value: String,
        progress: QuorumProgress,
    },
    /// Too few acceptors accepted
    NoConsensus { progress: QuorumProgress },
}

impl AcceptOutcome {
    pub fn progress(&self) -> QuorumProgress {
        match self {
            AcceptOutcome::Decided { progress, .. } | AcceptOutcome::NoConsensus { progress } => {
                *progress
            }
        }
    }
}

/// Peers that accepted, in ascending order
pub fn accepted_peers(responses: &ResponseSet<AcceptResponse>) -> Vec<PeerId> {
    responses
        .iter()
        .filter(|(_, response)| response.is_accepted())
        .map(|(peer, _)| *peer)
        .collect()
}

/// Count Accept responses against the majority of the whole pool
///
/// # Example
///
/// ```
/// use paxos_domain::paxos::{AcceptOutcome, AcceptResponse, ResponseSet, evaluate_accept};
/// use paxos_domain::{PeerId, PeerPool};
///
/// let pool = PeerPool::new(5).unwrap();
/// let responses: ResponseSet<AcceptResponse> = [
///     (PeerId::new(1), AcceptResponse::Accepted),
///     (PeerId::new(2), AcceptResponse::Accepted),
/// ]
/// .into_iter()
/// .collect();
///
/// let outcome = evaluate_accept(&responses, "v", &pool);
/// assert!(matches!(outcome, AcceptOutcome::NoConsensus { .. }));
/// assert_eq!(outcome.progress().achieved, 2);
/// assert_eq!(outcome.progress().required, 3);
/// ```
pub fn evaluate_accept(
    responses: &ResponseSet<AcceptResponse>,
    value: &str,
    pool: &PeerPool,
) -> AcceptOutcome {
    let progress = QuorumProgress::new(accepted_peers(responses).len(), pool.size());

    if progress.is_reached() {
        AcceptOutcome::Decided {
            value: value.to_string(),
            progress,
        }
    } else {
        AcceptOutcome::NoConsensus { progress }
    }
}
