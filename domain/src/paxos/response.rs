//! Per-peer responses collected during a phase

use crate::core::ids::{PeerId, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Responses of one phase keyed by peer
///
/// Each contacted peer appears exactly once, including peers that never
/// answered ([`PrepareResponse::Absent`] / [`AcceptResponse::Absent`]).
pub type ResponseSet<R> = BTreeMap<PeerId, R>;

/// A proposal an acceptor has already accepted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcceptedProposal {
    pub id: ProposalId,
    pub value: String,
}

impl AcceptedProposal {
    pub fn new(id: impl Into<ProposalId>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for AcceptedProposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, \"{}\")", self.id, self.value)
    }
}

/// Outcome of a Prepare request to one peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PrepareResponse {
    /// The acceptor promised; carries its previously accepted proposal, if any
    Promise {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promised_id: Option<ProposalId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accepted: Option<AcceptedProposal>,
    },
    /// The acceptor refused, typically because it promised a higher id
    Ignored {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promised_id: Option<ProposalId>,
    },
    /// No usable response within the transport bound
    Absent,
}

impl PrepareResponse {
    /// A promise with no prior accepted state
    pub fn promise() -> Self {
        PrepareResponse::Promise {
            promised_id: None,
            accepted: None,
        }
    }

    /// A promise reporting a previously accepted proposal
    pub fn promise_with(accepted_id: impl Into<ProposalId>, value: impl Into<String>) -> Self {
        PrepareResponse::Promise {
            promised_id: None,
            accepted: Some(AcceptedProposal::new(accepted_id, value)),
        }
    }

    pub fn ignored() -> Self {
        PrepareResponse::Ignored { promised_id: None }
    }

    pub fn is_promise(&self) -> bool {
        matches!(self, PrepareResponse::Promise { .. })
    }

    /// Prior accepted state carried by a promise
    ///
    /// Refusals never contribute accepted state, even when the acceptor
    /// reports it.
    pub fn accepted(&self) -> Option<&AcceptedProposal> {
        match self {
            PrepareResponse::Promise { accepted, .. } => accepted.as_ref(),
            _ => None,
        }
    }

    pub fn promised_id(&self) -> Option<ProposalId> {
        match self {
            PrepareResponse::Promise { promised_id, .. }
            | PrepareResponse::Ignored { promised_id } => *promised_id,
            PrepareResponse::Absent => None,
        }
    }
}

impl std::fmt::Display for PrepareResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrepareResponse::Promise {
                accepted: Some(accepted),
                ..
            } => write!(f, "promise, previously accepted {}", accepted),
            PrepareResponse::Promise { accepted: None, .. } => write!(f, "promise"),
            PrepareResponse::Ignored {
                promised_id: Some(id),
            } => write!(f, "ignored (promised {})", id),
            PrepareResponse::Ignored { promised_id: None } => write!(f, "ignored"),
            PrepareResponse::Absent => write!(f, "no response"),
        }
    }
}

/// Outcome of an Accept request to one peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptResponse {
    Accepted,
    Ignored,
    Absent,
}

impl AcceptResponse {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AcceptResponse::Accepted)
    }
}

impl std::fmt::Display for AcceptResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcceptResponse::Accepted => write!(f, "accepted"),
            AcceptResponse::Ignored => write!(f, "ignored"),
            AcceptResponse::Absent => write!(f, "no response"),
        }
    }
}

/// Promised/accepted state reported by an acceptor on inspection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcceptorState {
    pub promised_id: Option<ProposalId>,
    pub accepted: Option<AcceptedProposal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_never_exposes_accepted_state() {
        let ignored = PrepareResponse::Ignored {
            promised_id: Some(ProposalId::new(9)),
        };
        assert!(!ignored.is_promise());
        assert!(ignored.accepted().is_none());
        assert_eq!(ignored.promised_id(), Some(ProposalId::new(9)));
    }

    #[test]
    fn test_prepare_response_display() {
        assert_eq!(PrepareResponse::promise().to_string(), "promise");
        assert_eq!(
            PrepareResponse::promise_with(3u64, "x").to_string(),
            "promise, previously accepted (3, \"x\")"
        );
        assert_eq!(PrepareResponse::Absent.to_string(), "no response");
        assert_eq!(AcceptResponse::Accepted.to_string(), "accepted");
    }

    #[test]
    fn test_prepare_response_serialize_tagged() {
        let json = serde_json::to_value(PrepareResponse::promise_with(2u64, "a")).unwrap();
        assert_eq!(json["outcome"], "promise");
        assert_eq!(json["accepted"]["id"], 2);
        assert_eq!(json["accepted"]["value"], "a");
        assert!(json.get("promised_id").is_none());

        let json = serde_json::to_value(PrepareResponse::Absent).unwrap();
        assert_eq!(json["outcome"], "absent");
    }
}
