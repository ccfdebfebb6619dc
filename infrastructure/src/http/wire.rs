//! JSON bodies exchanged with acceptors
//!
//! Acceptors use camelCase field names and report "nothing yet" either by
//! omitting an id or by sending a negative one.

use super::error::{HttpError, Result};
use paxos_domain::{AcceptResponse, AcceptedProposal, AcceptorState, PrepareResponse, ProposalId};
use serde::Deserialize;
use tracing::warn;

/// Body of a Prepare reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromiseBody {
    pub ignored: bool,
    #[serde(default)]
    pub promised_id: Option<i64>,
    #[serde(default)]
    pub accepted_id: Option<i64>,
    #[serde(default)]
    pub accepted_value: Option<String>,
}

/// Body of an Accept reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptBody {
    pub ignored: bool,
    #[serde(default)]
    pub accepted_id: Option<i64>,
    #[serde(default)]
    pub accepted_value: Option<String>,
}

/// Body of a state reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBody {
    #[serde(default)]
    pub promised_id: Option<i64>,
    #[serde(default)]
    pub accepted_id: Option<i64>,
    #[serde(default)]
    pub accepted_value: Option<String>,
}

fn proposal_id(raw: Option<i64>) -> Option<ProposalId> {
    raw.and_then(|id| u64::try_from(id).ok()).map(ProposalId::new)
}

/// Pair an accepted id with its value
///
/// An id without a value cannot be adopted; the reply still counts as a
/// promise with no prior accepted proposal.
fn accepted(id: Option<i64>, value: Option<String>) -> Option<AcceptedProposal> {
    match (proposal_id(id), value) {
        (Some(id), Some(value)) => Some(AcceptedProposal::new(id, value)),
        (Some(id), None) => {
            warn!("acceptedId {} reported without acceptedValue; ignoring it", id);
            None
        }
        (None, _) => None,
    }
}

impl From<PromiseBody> for PrepareResponse {
    fn from(body: PromiseBody) -> Self {
        let promised_id = proposal_id(body.promised_id);
        if body.ignored {
            return PrepareResponse::Ignored { promised_id };
        }
        PrepareResponse::Promise {
            promised_id,
            accepted: accepted(body.accepted_id, body.accepted_value),
        }
    }
}

impl From<AcceptBody> for AcceptResponse {
    fn from(body: AcceptBody) -> Self {
        if body.ignored {
            AcceptResponse::Ignored
        } else {
            AcceptResponse::Accepted
        }
    }
}

impl From<StateBody> for AcceptorState {
    fn from(body: StateBody) -> Self {
        AcceptorState {
            promised_id: proposal_id(body.promised_id),
            accepted: accepted(body.accepted_id, body.accepted_value),
        }
    }
}

/// Decode a JSON body, keeping the raw text for diagnostics
pub fn decode<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| HttpError::ParseError {
        error: e.to_string(),
        raw: raw.to_string(),
    })
}
