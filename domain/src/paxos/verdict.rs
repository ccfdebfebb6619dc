//! Final outcome of a proposal

use crate::quorum::QuorumProgress;
use serde::{Deserialize, Serialize};

/// Phase in which consensus was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecidedVia {
    /// A majority had already accepted the value in an earlier round
    Prepare,
    /// A majority accepted the value in this round
    Accept,
}

impl std::fmt::Display for DecidedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecidedVia::Prepare => write!(f, "prepare"),
            DecidedVia::Accept => write!(f, "accept"),
        }
    }
}

/// Verdict of one proposal run
///
/// Quorum failures are ordinary verdicts, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    ConsensusReached {
        value: String,
        via: DecidedVia,
        progress: QuorumProgress,
    },
    NoConsensus {
        progress: QuorumProgress,
    },
    NoPromises,
}

impl Verdict {
    pub fn is_consensus(&self) -> bool {
        matches!(self, Verdict::ConsensusReached { .. })
    }

    /// The decided value, if consensus was reached
    pub fn value(&self) -> Option<&str> {
        match self {
            Verdict::ConsensusReached { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::ConsensusReached { value, via, .. } => {
                write!(f, "Consensus reached on \"{}\" via {}", value, via)
            }
            Verdict::NoConsensus { progress } => write!(
                f,
                "No consensus: accepted by {}, majority required {}",
                progress.achieved, progress.required
            ),
            Verdict::NoPromises => write!(f, "No promises received"),
        }
    }
}
