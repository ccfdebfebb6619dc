//! Reports produced by proposer runs

use super::prepare::ChosenValue;
use super::response::{AcceptResponse, AcceptedProposal, AcceptorState, PrepareResponse, ResponseSet};
use super::state::ProposerState;
use super::verdict::Verdict;
use crate::core::ids::{PeerId, ProposalId};
use crate::quorum::{QuorumProgress, majority};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete trace and verdict of one proposal run (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalReport {
    pub pool_size: usize,
    pub majority: usize,
    pub proposal_id: ProposalId,
    /// Value supplied by the caller
    pub proposed_value: String,
    pub contacted: Vec<PeerId>,
    pub prepare: ResponseSet<PrepareResponse>,
    /// Value sent in the Accept phase; absent when the run stopped after Prepare
    pub chosen: Option<ChosenValue>,
    /// Accept trace; absent when the Accept phase did not run
    pub accept: Option<ResponseSet<AcceptResponse>>,
    pub state: ProposerState,
    /// Absent when the run was aborted before a verdict
    pub verdict: Option<Verdict>,
}

impl ProposalReport {
    /// Peers that promised during Prepare
    pub fn promised(&self) -> Vec<PeerId> {
        super::prepare::promised_peers(&self.prepare)
    }

    /// Peers that accepted during Accept
    pub fn accepted(&self) -> Vec<PeerId> {
        self.accept
            .as_ref()
            .map(super::accept::accepted_peers)
            .unwrap_or_default()
    }
}

/// Responses of a single-phase broadcast (no verdict is computed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum BroadcastReport {
    Prepare {
        proposal_id: ProposalId,
        responses: ResponseSet<PrepareResponse>,
    },
    Accept {
        proposal_id: ProposalId,
        value: String,
        responses: ResponseSet<AcceptResponse>,
    },
}

impl BroadcastReport {
    /// Peers that answered affirmatively (promised or accepted)
    pub fn affirmative(&self) -> Vec<PeerId> {
        match self {
            BroadcastReport::Prepare { responses, .. } => {
                super::prepare::promised_peers(responses)
            }
            BroadcastReport::Accept { responses, .. } => super::accept::accepted_peers(responses),
        }
    }
}

/// Acceptor states gathered from the pool; `None` marks a peer that did not answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateReport {
    pub pool_size: usize,
    pub states: ResponseSet<Option<AcceptorState>>,
}

impl StateReport {
    /// The accepted proposal held by a majority of the pool, if any
    ///
    /// When this returns a proposal, its value is chosen.
    pub fn chosen(&self) -> Option<(AcceptedProposal, QuorumProgress)> {
        let mut tally: HashMap<&AcceptedProposal, usize> = HashMap::new();
        for accepted in self
            .states
            .values()
            .filter_map(|state| state.as_ref()?.accepted.as_ref())
        {
            *tally.entry(accepted).or_insert(0) += 1;
        }

        tally
            .into_iter()
            .find(|(_, count)| *count >= majority(self.pool_size))
            .map(|(accepted, count)| (accepted.clone(), QuorumProgress::new(count, self.pool_size)))
    }

    pub fn responded(&self) -> usize {
        self.states.values().filter(|state| state.is_some()).count()
    }
}
