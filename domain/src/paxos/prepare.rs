//! Prepare-phase evaluation
//!
//! Turns the collected Prepare responses into one of three outcomes: no
//! promises at all, a value already chosen by a prior round, or the promise
//! set and value to carry into the Accept phase.

use super::response::{AcceptedProposal, PrepareResponse, ResponseSet};
use crate::cluster::PeerPool;
use crate::core::error::DomainError;
use crate::core::ids::{PeerId, ProposalId};
use crate::quorum::QuorumProgress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value the proposer will ask acceptors to accept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenValue {
    pub value: String,
    /// Set when a promise forced the value; the highest accepted proposal seen
    pub overridden_by: Option<AcceptedProposal>,
}

impl ChosenValue {
    /// Keep the value the proposer was asked to propose
    pub fn proposed(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            overridden_by: None,
        }
    }

    /// Adopt the value of a previously accepted proposal
    pub fn prior(accepted: AcceptedProposal) -> Self {
        Self {
            value: accepted.value.clone(),
            overridden_by: Some(accepted),
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden_by.is_some()
    }
}

/// Result of the Prepare phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PrepareOutcome {
    /// Nobody promised; there is nothing to send Accept requests to
    NoPromises,
    /// A majority of the pool already accepted the same proposal
    EarlyDecided {
        accepted: AcceptedProposal,
        progress: QuorumProgress,
    },
    /// Continue to the Accept phase with these peers and this value
    Proceed {
        promised: Vec<PeerId>,
        chosen: ChosenValue,
    },
}

/// Peers whose Prepare response was a promise, in ascending order
pub fn promised_peers(responses: &ResponseSet<PrepareResponse>) -> Vec<PeerId> {
    responses
        .iter()
        .filter(|(_, response)| response.is_promise())
        .map(|(peer, _)| *peer)
        .collect()
}

/// Evaluate the Prepare responses of one round
///
/// `proposed` is the value the proposer was asked to propose. It is replaced
/// by the value of the highest accepted proposal carried by any promise.
///
/// # Errors
///
/// [`DomainError::ConflictingAcceptedValues`] when no early decision applies
/// and two promises report the same highest accepted id with different
/// values. Correct acceptors never produce this, so no value is picked.
///
/// # Example
///
/// ```
/// use paxos_domain::paxos::{PrepareOutcome, PrepareResponse, ResponseSet, evaluate_prepare};
/// use paxos_domain::{PeerId, PeerPool};
///
/// let pool = PeerPool::new(3).unwrap();
/// let mut responses = ResponseSet::new();
/// responses.insert(PeerId::new(1), PrepareResponse::promise_with(4u64, "y"));
/// responses.insert(PeerId::new(2), PrepareResponse::promise());
///
/// match evaluate_prepare(&responses, "mine", &pool).unwrap() {
///     PrepareOutcome::Proceed { promised, chosen } => {
///         assert_eq!(promised.len(), 2);
///         assert_eq!(chosen.value, "y");
///     }
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
pub fn evaluate_prepare(
    responses: &ResponseSet<PrepareResponse>,
    proposed: &str,
    pool: &PeerPool,
) -> Result<PrepareOutcome, DomainError> {
    let promised = promised_peers(responses);
    if promised.is_empty() {
        return Ok(PrepareOutcome::NoPromises);
    }

    let reports: Vec<&AcceptedProposal> = responses
        .values()
        .filter_map(PrepareResponse::accepted)
        .collect();

    // A value accepted by a majority is already chosen, whatever else was reported
    if let Some((accepted, count)) = majority_accepted(&reports, pool) {
        return Ok(PrepareOutcome::EarlyDecided {
            accepted: accepted.clone(),
            progress: QuorumProgress::new(count, pool.size()),
        });
    }

    let chosen = match highest_accepted(&reports)? {
        Some(highest) => ChosenValue::prior(highest.clone()),
        None => ChosenValue::proposed(proposed),
    };

    Ok(PrepareOutcome::Proceed { promised, chosen })
}

/// Accepted proposal with the highest id among the reports
fn highest_accepted<'a>(
    reports: &[&'a AcceptedProposal],
) -> Result<Option<&'a AcceptedProposal>, DomainError> {
    let Some(max_id) = reports.iter().map(|r| r.id).max() else {
        return Ok(None);
    };

    let mut at_max = reports.iter().filter(|r| r.id == max_id);
    // at least one report carries max_id
    let Some(first) = at_max.next() else {
        return Ok(None);
    };

    if let Some(conflict) = at_max.find(|r| r.value != first.value) {
        let (a, b) = ordered_pair(&first.value, &conflict.value);
        return Err(DomainError::ConflictingAcceptedValues {
            accepted_id: max_id,
            first: a.to_string(),
            second: b.to_string(),
        });
    }

    Ok(Some(*first))
}

/// The accepted proposal reported by at least a majority of the pool, if any
///
/// At most one proposal can qualify: each peer reports one pair and any two
/// majorities overlap.
fn majority_accepted<'a>(
    reports: &[&'a AcceptedProposal],
    pool: &PeerPool,
) -> Option<(&'a AcceptedProposal, usize)> {
    let mut tally: HashMap<(ProposalId, &str), (&AcceptedProposal, usize)> = HashMap::new();
    for &report in reports {
        tally
            .entry((report.id, report.value.as_str()))
            .or_insert((report, 0))
            .1 += 1;
    }

    tally
        .into_values()
        .filter(|(_, count)| *count >= pool.majority())
        .max_by_key(|(accepted, count)| (*count, accepted.id))
}

fn ordered_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}
