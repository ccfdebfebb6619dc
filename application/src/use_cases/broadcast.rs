//! Broadcast use case
//!
//! Sends a single Prepare or Accept to a set of peers and records every
//! response. No quorum verdict is computed; this is the tool for driving
//! acceptors by hand.

use crate::config::BehaviorConfig;
use crate::ports::acceptor_gateway::AcceptorGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::fan_out;
use paxos_domain::{
    AcceptResponse, BroadcastReport, ContactPlan, DomainError, PeerId, PeerPool, Phase,
    PrepareResponse, ProposalId,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which single-phase message to broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastMessage {
    Prepare,
    Accept { value: String },
}

impl BroadcastMessage {
    pub fn phase(&self) -> Phase {
        match self {
            BroadcastMessage::Prepare => Phase::Prepare,
            BroadcastMessage::Accept { .. } => Phase::Accept,
        }
    }
}

/// Input for the Broadcast use case
#[derive(Debug, Clone)]
pub struct BroadcastInput {
    pub pool: PeerPool,
    pub contact: ContactPlan,
    pub proposal_id: ProposalId,
    pub message: BroadcastMessage,
}

impl BroadcastInput {
    pub fn new(
        pool: PeerPool,
        contact: ContactPlan,
        proposal_id: impl Into<ProposalId>,
        message: BroadcastMessage,
    ) -> Self {
        Self {
            pool,
            contact,
            proposal_id: proposal_id.into(),
            message,
        }
    }

    /// Target exactly `peers`, using the smallest pool that contains them
    /// when `pool` is not given
    pub fn to_peers(
        pool: Option<PeerPool>,
        peers: Vec<PeerId>,
        proposal_id: impl Into<ProposalId>,
        message: BroadcastMessage,
    ) -> Result<Self, DomainError> {
        let pool = match pool {
            Some(pool) => pool,
            None => {
                let highest = peers.iter().map(PeerId::value).max().unwrap_or(0);
                PeerPool::new(highest)?
            }
        };
        Ok(Self::new(pool, ContactPlan::Explicit(peers), proposal_id, message))
    }
}

/// Use case for single-phase Prepare/Accept broadcasts
pub struct BroadcastUseCase<G: AcceptorGateway + 'static> {
    gateway: Arc<G>,
    behavior: BehaviorConfig,
}

impl<G: AcceptorGateway + 'static> BroadcastUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            behavior: BehaviorConfig::default(),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub async fn execute(&self, input: BroadcastInput) -> Result<BroadcastReport, DomainError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: BroadcastInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<BroadcastReport, DomainError> {
        let peers = {
            let mut rng = rand::thread_rng();
            input.pool.select(&input.contact, &mut rng)?
        };
        let proposal_id = input.proposal_id;
        let timeout = self.behavior.request_timeout;
        let phase = input.message.phase();

        info!(
            "Broadcasting {} (id {}) to {} peer(s)",
            phase,
            proposal_id,
            peers.len()
        );
        progress.on_phase_start(phase, &peers);

        let report = match input.message {
            BroadcastMessage::Prepare => {
                let results = fan_out(
                    &self.gateway,
                    &peers,
                    timeout,
                    |gateway, peer| async move { gateway.prepare(peer, proposal_id).await },
                    |peer, result| match result {
                        Ok(response) => {
                            debug!("[prepare] peer {}: {}", peer, response);
                            progress.on_prepare_response(peer, response);
                        }
                        Err(e) => {
                            warn!("[prepare] peer {}: no response ({})", peer, e);
                            progress.on_prepare_response(peer, &PrepareResponse::Absent);
                        }
                    },
                )
                .await;

                BroadcastReport::Prepare {
                    proposal_id,
                    responses: results
                        .into_iter()
                        .map(|(peer, result)| (peer, result.unwrap_or(PrepareResponse::Absent)))
                        .collect(),
                }
            }
            BroadcastMessage::Accept { value } => {
                let results = fan_out(
                    &self.gateway,
                    &peers,
                    timeout,
                    |gateway, peer| {
                        let value = value.clone();
                        async move { gateway.accept(peer, proposal_id, &value).await }
                    },
                    |peer, result| match result {
                        Ok(response) => {
                            debug!("[accept] peer {}: {}", peer, response);
                            progress.on_accept_response(peer, response);
                        }
                        Err(e) => {
                            warn!("[accept] peer {}: no response ({})", peer, e);
                            progress.on_accept_response(peer, &AcceptResponse::Absent);
                        }
                    },
                )
                .await;

                BroadcastReport::Accept {
                    proposal_id,
                    value,
                    responses: results
                        .into_iter()
                        .map(|(peer, result)| (peer, result.unwrap_or(AcceptResponse::Absent)))
                        .collect(),
                }
            }
        };

        progress.on_phase_complete(phase);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::run_proposal::tests::ScriptedGateway;

    fn peers(ids: &[usize]) -> Vec<PeerId> {
        ids.iter().copied().map(PeerId::new).collect()
    }

    #[tokio::test]
    async fn test_prepare_broadcast_records_every_peer() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise())
                .on_prepare(3, PrepareResponse::ignored()),
        );
        let use_case = BroadcastUseCase::new(Arc::clone(&gateway));

        let input =
            BroadcastInput::to_peers(None, peers(&[1, 3, 4]), 9u64, BroadcastMessage::Prepare)
                .unwrap();
        let report = use_case.execute(input).await.unwrap();

        match &report {
            BroadcastReport::Prepare { responses, .. } => {
                assert_eq!(responses.len(), 3);
                assert_eq!(responses[&PeerId::new(4)], PrepareResponse::Absent);
            }
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(report.affirmative(), peers(&[1]));
        assert!(gateway.accept_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accept_broadcast_sends_value_without_prepare() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_accept(1, AcceptResponse::Accepted)
                .on_accept(2, AcceptResponse::Ignored),
        );
        let use_case = BroadcastUseCase::new(Arc::clone(&gateway));

        let input = BroadcastInput::to_peers(
            Some(PeerPool::new(3).unwrap()),
            peers(&[1, 2]),
            9u64,
            BroadcastMessage::Accept {
                value: "v".to_string(),
            },
        )
        .unwrap();
        let report = use_case.execute(input).await.unwrap();

        assert_eq!(report.affirmative(), peers(&[1]));
        assert!(gateway.prepare_calls.lock().unwrap().is_empty());
        assert_eq!(gateway.accept_targets(), peers(&[1, 2]));
    }

    #[tokio::test]
    async fn test_peer_outside_pool_is_rejected() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = BroadcastUseCase::new(Arc::clone(&gateway));

        let input = BroadcastInput::to_peers(
            Some(PeerPool::new(2).unwrap()),
            peers(&[3]),
            1u64,
            BroadcastMessage::Prepare,
        )
        .unwrap();
        let err = use_case.execute(input).await.unwrap_err();

        assert!(matches!(err, DomainError::PeerOutOfRange { .. }));
        assert!(gateway.prepare_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_peer_list_without_pool_is_rejected() {
        let err = BroadcastInput::to_peers(None, Vec::new(), 1u64, BroadcastMessage::Prepare)
            .unwrap_err();
        assert_eq!(err, DomainError::EmptyPool);
    }
}
