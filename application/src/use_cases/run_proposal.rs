//! Run Proposal use case
//!
//! Orchestrates one Prepare round and at most one Accept round against the
//! acceptor pool, then reports the verdict. There is no retry: a failed
//! proposal is reported, not re-proposed.

use crate::config::BehaviorConfig;
use crate::ports::acceptor_gateway::AcceptorGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::fan_out;
use paxos_domain::paxos::{evaluate_accept, evaluate_prepare};
use paxos_domain::{
    AcceptOutcome, AcceptResponse, ContactPlan, DecidedVia, DomainError, PeerId, PeerPool, Phase,
    PrepareOutcome, PrepareResponse, ProposalId, ProposalReport, ProposerState, ResponseSet,
    Verdict,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a proposal run
///
/// Failing to reach a quorum is not an error; see [`Verdict`].
#[derive(Error, Debug)]
pub enum RunProposalError {
    #[error("Invalid proposal input: {0}")]
    InvalidInput(DomainError),

    /// Acceptors broke a Paxos invariant; `report` holds the Prepare trace
    /// collected before the run was aborted
    #[error("Acceptor invariant violated: {error}")]
    Protocol {
        error: DomainError,
        report: Box<ProposalReport>,
    },

    #[error("Proposer state error: {0}")]
    State(DomainError),
}

impl RunProposalError {
    /// Partial trace of an aborted run, if one was collected
    pub fn report(&self) -> Option<&ProposalReport> {
        match self {
            RunProposalError::Protocol { report, .. } => Some(report),
            _ => None,
        }
    }
}

impl From<DomainError> for RunProposalError {
    fn from(error: DomainError) -> Self {
        if error.is_input_error() {
            RunProposalError::InvalidInput(error)
        } else {
            RunProposalError::State(error)
        }
    }
}

/// Input for the RunProposal use case
#[derive(Debug, Clone)]
pub struct RunProposalInput {
    pub pool: PeerPool,
    pub proposal_id: ProposalId,
    /// Which peers receive Prepare requests
    pub contact: ContactPlan,
    /// Value to propose when no acceptor reports a prior accepted value
    pub value: String,
}

impl RunProposalInput {
    /// Propose `value` to the whole pool
    pub fn new(pool: PeerPool, proposal_id: impl Into<ProposalId>, value: impl Into<String>) -> Self {
        Self {
            pool,
            proposal_id: proposal_id.into(),
            contact: ContactPlan::All,
            value: value.into(),
        }
    }

    pub fn with_contact(mut self, contact: ContactPlan) -> Self {
        self.contact = contact;
        self
    }
}

/// Use case for running a single Paxos proposal
pub struct RunProposalUseCase<G: AcceptorGateway + 'static> {
    gateway: Arc<G>,
    behavior: BehaviorConfig,
}

impl<G: AcceptorGateway + 'static> RunProposalUseCase<G> {
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

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunProposalInput) -> Result<ProposalReport, RunProposalError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunProposalInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ProposalReport, RunProposalError> {
        // Validate before any request is issued
        let contacted = {
            let mut rng = rand::thread_rng();
            input.pool.select(&input.contact, &mut rng)?
        };

        let pool = input.pool;
        let proposal_id = input.proposal_id;
        let mut state = ProposerState::Init.advance(ProposerState::Preparing)?;

        info!(
            "Proposal {}: contacting {} of {} acceptors (majority {})",
            proposal_id,
            contacted.len(),
            pool.size(),
            pool.majority()
        );

        let prepare = self.phase_prepare(proposal_id, &contacted, progress).await;

        let mut report = ProposalReport {
            pool_size: pool.size(),
            majority: pool.majority(),
            proposal_id,
            proposed_value: input.value.clone(),
            contacted,
            prepare,
            chosen: None,
            accept: None,
            state,
            verdict: None,
        };

        let outcome = match evaluate_prepare(&report.prepare, &input.value, &pool) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("Aborting proposal {}: {}", proposal_id, error);
                return Err(RunProposalError::Protocol {
                    error,
                    report: Box::new(report),
                });
            }
        };

        match outcome {
            PrepareOutcome::NoPromises => {
                info!("No promises received, skipping accept phase");
                state = state.advance(ProposerState::NoPromises)?;
                report.verdict = Some(Verdict::NoPromises);
            }
            PrepareOutcome::EarlyDecided {
                accepted,
                progress: quorum,
            } => {
                info!(
                    "Consensus already reached during prepare: acceptedId={}, value={} ({})",
                    accepted.id, accepted.value, quorum
                );
                state = state.advance(ProposerState::EarlyDecided)?;
                report.verdict = Some(Verdict::ConsensusReached {
                    value: accepted.value,
                    via: DecidedVia::Prepare,
                    progress: quorum,
                });
            }
            PrepareOutcome::Proceed { promised, chosen } => {
                if let Some(accepted) = &chosen.overridden_by {
                    info!(
                        "Proposed value overridden by prior accepted value: acceptedId={}, value={}",
                        accepted.id, accepted.value
                    );
                    progress.on_value_overridden(accepted);
                }

                state = state.advance(ProposerState::Accepting)?;
                let accept = self
                    .phase_accept(proposal_id, &chosen.value, &promised, progress)
                    .await;

                match evaluate_accept(&accept, &chosen.value, &pool) {
                    AcceptOutcome::Decided {
                        value,
                        progress: quorum,
                    } => {
                        info!("Consensus reached on {} ({})", value, quorum);
                        state = state.advance(ProposerState::Decided)?;
                        report.verdict = Some(Verdict::ConsensusReached {
                            value,
                            via: DecidedVia::Accept,
                            progress: quorum,
                        });
                    }
                    AcceptOutcome::NoConsensus { progress: quorum } => {
                        info!("No consensus: {} accepts", quorum);
                        state = state.advance(ProposerState::NoConsensus)?;
                        report.verdict = Some(Verdict::NoConsensus { progress: quorum });
                    }
                }

                report.chosen = Some(chosen);
                report.accept = Some(accept);
            }
        }

        report.state = state;
        Ok(report)
    }

    /// Phase 1: Send Prepare to every contacted peer in parallel
    async fn phase_prepare(
        &self,
        proposal_id: ProposalId,
        peers: &[PeerId],
        progress: &dyn ProgressNotifier,
    ) -> ResponseSet<PrepareResponse> {
        info!("Phase 1: Prepare");
        progress.on_phase_start(Phase::Prepare, peers);

        let results = fan_out(
            &self.gateway,
            peers,
            self.behavior.request_timeout,
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

        progress.on_phase_complete(Phase::Prepare);

        results
            .into_iter()
            .map(|(peer, result)| (peer, result.unwrap_or(PrepareResponse::Absent)))
            .collect()
    }

    /// Phase 2: Send Accept to the peers that promised, and only to them
    async fn phase_accept(
        &self,
        proposal_id: ProposalId,
        value: &str,
        promised: &[PeerId],
        progress: &dyn ProgressNotifier,
    ) -> ResponseSet<AcceptResponse> {
        info!("Phase 2: Accept with value {}", value);
        progress.on_phase_start(Phase::Accept, promised);

        let results = fan_out(
            &self.gateway,
            promised,
            self.behavior.request_timeout,
            |gateway, peer| {
                let value = value.to_string();
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

        progress.on_phase_complete(Phase::Accept);

        results
            .into_iter()
            .map(|(peer, result)| (peer, result.unwrap_or(AcceptResponse::Absent)))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::acceptor_gateway::GatewayError;
    use async_trait::async_trait;
    use paxos_domain::{AcceptedProposal, AcceptorState, QuorumProgress};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Gateway answering from per-peer scripts; unscripted peers refuse connections
    #[derive(Default)]
    pub(crate) struct ScriptedGateway {
        pub prepare: HashMap<PeerId, Result<PrepareResponse, GatewayError>>,
        pub accept: HashMap<PeerId, Result<AcceptResponse, GatewayError>>,
        pub state: HashMap<PeerId, AcceptorState>,
        /// Peers that never answer
        pub stalled: HashSet<PeerId>,
        pub prepare_calls: Mutex<Vec<PeerId>>,
        pub accept_calls: Mutex<Vec<(PeerId, String)>>,
    }

    impl ScriptedGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on_prepare(mut self, peer: usize, response: PrepareResponse) -> Self {
            self.prepare.insert(PeerId::new(peer), Ok(response));
            self
        }

        pub fn on_accept(mut self, peer: usize, response: AcceptResponse) -> Self {
            self.accept.insert(PeerId::new(peer), Ok(response));
            self
        }

        pub fn with_state(mut self, peer: usize, state: AcceptorState) -> Self {
            self.state.insert(PeerId::new(peer), state);
            self
        }

        pub fn stall(mut self, peer: usize) -> Self {
            self.stalled.insert(PeerId::new(peer));
            self
        }

        pub fn accept_targets(&self) -> Vec<PeerId> {
            let mut peers: Vec<_> = self
                .accept_calls
                .lock()
                .unwrap()
                .iter()
                .map(|(peer, _)| *peer)
                .collect();
            peers.sort();
            peers
        }

        async fn maybe_stall(&self, peer: PeerId) {
            if self.stalled.contains(&peer) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }
    }

    fn refused() -> GatewayError {
        GatewayError::ConnectionError("connection refused".to_string())
    }

    #[async_trait]
    impl AcceptorGateway for ScriptedGateway {
        async fn prepare(
            &self,
            peer: PeerId,
            _proposal_id: ProposalId,
        ) -> Result<PrepareResponse, GatewayError> {
            self.prepare_calls.lock().unwrap().push(peer);
            self.maybe_stall(peer).await;
            self.prepare.get(&peer).cloned().unwrap_or_else(|| Err(refused()))
        }

        async fn accept(
            &self,
            peer: PeerId,
            _proposal_id: ProposalId,
            value: &str,
        ) -> Result<AcceptResponse, GatewayError> {
            self.accept_calls
                .lock()
                .unwrap()
                .push((peer, value.to_string()));
            self.maybe_stall(peer).await;
            self.accept.get(&peer).cloned().unwrap_or_else(|| Err(refused()))
        }

        async fn state(&self, peer: PeerId) -> Result<AcceptorState, GatewayError> {
            self.maybe_stall(peer).await;
            self.state.get(&peer).cloned().ok_or_else(refused)
        }
    }

    fn peers(ids: &[usize]) -> Vec<PeerId> {
        ids.iter().copied().map(PeerId::new).collect()
    }

    fn input(pool: usize, contact: &[usize], value: &str) -> RunProposalInput {
        RunProposalInput::new(PeerPool::new(pool).unwrap(), 10u64, value)
            .with_contact(ContactPlan::Explicit(peers(contact)))
    }

    #[tokio::test]
    async fn test_accept_phase_reaches_majority() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise())
                .on_prepare(2, PrepareResponse::promise())
                .on_prepare(3, PrepareResponse::promise())
                .on_prepare(4, PrepareResponse::promise())
                .on_accept(1, AcceptResponse::Accepted)
                .on_accept(2, AcceptResponse::Accepted)
                .on_accept(3, AcceptResponse::Accepted)
                .on_accept(4, AcceptResponse::Ignored),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(5, &[1, 2, 3, 4], "v")).await.unwrap();

        assert_eq!(
            report.verdict,
            Some(Verdict::ConsensusReached {
                value: "v".to_string(),
                via: DecidedVia::Accept,
                progress: QuorumProgress::new(3, 5),
            })
        );
        assert_eq!(report.state, ProposerState::Decided);
        assert_eq!(report.accepted(), peers(&[1, 2, 3]));
        assert_eq!(gateway.accept_targets(), peers(&[1, 2, 3, 4]));
    }

    #[tokio::test]
    async fn test_accept_only_sent_to_promised_peers() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise())
                .on_prepare(2, PrepareResponse::promise())
                .on_prepare(3, PrepareResponse::ignored())
                .on_accept(1, AcceptResponse::Accepted)
                .on_accept(2, AcceptResponse::Accepted)
                .on_accept(3, AcceptResponse::Accepted),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(5, &[1, 2, 3, 4], "v")).await.unwrap();

        assert_eq!(gateway.accept_targets(), peers(&[1, 2]));
        assert_eq!(
            report.verdict,
            Some(Verdict::NoConsensus {
                progress: QuorumProgress::new(2, 5)
            })
        );
        assert_eq!(report.state, ProposerState::NoConsensus);
        assert_eq!(report.prepare.get(&PeerId::new(4)), Some(&PrepareResponse::Absent));
    }

    #[tokio::test]
    async fn test_early_decision_skips_accept_phase() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise_with(2u64, "a"))
                .on_prepare(2, PrepareResponse::promise_with(2u64, "a"))
                .on_prepare(3, PrepareResponse::promise_with(2u64, "a"))
                .on_prepare(4, PrepareResponse::promise_with(2u64, "b")),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(5, &[1, 2, 3, 4, 5], "mine")).await.unwrap();

        assert_eq!(
            report.verdict,
            Some(Verdict::ConsensusReached {
                value: "a".to_string(),
                via: DecidedVia::Prepare,
                progress: QuorumProgress::new(3, 5),
            })
        );
        assert_eq!(report.state, ProposerState::EarlyDecided);
        assert!(report.accept.is_none());
        assert!(gateway.accept_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_ignored_yields_no_promises() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::ignored())
                .on_prepare(2, PrepareResponse::ignored())
                .on_prepare(3, PrepareResponse::ignored()),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let report = use_case
            .execute(RunProposalInput::new(PeerPool::new(3).unwrap(), 4u64, "v"))
            .await
            .unwrap();

        assert_eq!(report.verdict, Some(Verdict::NoPromises));
        assert_eq!(report.state, ProposerState::NoPromises);
        assert!(report.chosen.is_none());
        assert!(gateway.accept_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prior_accepted_value_is_proposed() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise_with(3u64, "x"))
                .on_prepare(2, PrepareResponse::promise_with(7u64, "y"))
                .on_prepare(3, PrepareResponse::promise_with(5u64, "z"))
                .on_accept(1, AcceptResponse::Accepted)
                .on_accept(2, AcceptResponse::Accepted)
                .on_accept(3, AcceptResponse::Accepted),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(5, &[1, 2, 3], "mine")).await.unwrap();

        let sent: Vec<String> = gateway
            .accept_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, value)| value.clone())
            .collect();
        assert_eq!(sent, vec!["y".to_string(); 3]);

        let chosen = report.chosen.as_ref().unwrap();
        assert_eq!(chosen.value, "y");
        assert_eq!(chosen.overridden_by, Some(AcceptedProposal::new(7u64, "y")));
        assert_eq!(report.verdict.as_ref().and_then(Verdict::value), Some("y"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresponsive_peers_are_recorded_absent() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise())
                .on_prepare(2, PrepareResponse::promise())
                .stall(3)
                .on_accept(1, AcceptResponse::Accepted)
                .on_accept(2, AcceptResponse::Accepted),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway))
            .with_behavior(BehaviorConfig::with_timeout_millis(100));

        let report = use_case.execute(input(3, &[1, 2, 3], "v")).await.unwrap();

        assert_eq!(report.prepare.len(), 3);
        assert_eq!(report.prepare[&PeerId::new(3)], PrepareResponse::Absent);
        assert_eq!(gateway.accept_targets(), peers(&[1, 2]));
        assert!(report.verdict.as_ref().is_some_and(Verdict::is_consensus));
    }

    #[tokio::test]
    async fn test_failed_accepts_are_absent_and_not_counted() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise())
                .on_prepare(2, PrepareResponse::promise())
                .on_prepare(3, PrepareResponse::promise())
                .on_accept(1, AcceptResponse::Accepted),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(3, &[1, 2, 3], "v")).await.unwrap();

        let accept = report.accept.as_ref().unwrap();
        assert_eq!(accept[&PeerId::new(2)], AcceptResponse::Absent);
        assert_eq!(accept[&PeerId::new(3)], AcceptResponse::Absent);
        assert_eq!(
            report.verdict,
            Some(Verdict::NoConsensus {
                progress: QuorumProgress::new(1, 3)
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_contact_count_fails_before_any_request() {
        let gateway = Arc::new(ScriptedGateway::new());
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let input = RunProposalInput::new(PeerPool::new(5).unwrap(), 1u64, "v")
            .with_contact(ContactPlan::Random(6));
        let err = use_case.execute(input).await.unwrap_err();

        assert!(matches!(
            err,
            RunProposalError::InvalidInput(DomainError::ContactCountExceedsPool { .. })
        ));
        assert!(gateway.prepare_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_random_contact_subset() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::ignored())
                .on_prepare(2, PrepareResponse::ignored())
                .on_prepare(3, PrepareResponse::ignored())
                .on_prepare(4, PrepareResponse::ignored())
                .on_prepare(5, PrepareResponse::ignored()),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let input = RunProposalInput::new(PeerPool::new(5).unwrap(), 1u64, "v")
            .with_contact(ContactPlan::Random(2));
        let report = use_case.execute(input).await.unwrap();

        assert_eq!(report.contacted.len(), 2);
        assert_eq!(gateway.prepare_calls.lock().unwrap().len(), 2);
        assert_eq!(report.prepare.len(), 2);
    }

    #[tokio::test]
    async fn test_conflicting_prior_values_fail_loudly() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise_with(4u64, "p"))
                .on_prepare(2, PrepareResponse::promise_with(4u64, "q")),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let err = use_case.execute(input(5, &[1, 2], "v")).await.unwrap_err();

        match &err {
            RunProposalError::Protocol { error, report } => {
                assert!(matches!(
                    error,
                    DomainError::ConflictingAcceptedValues { .. }
                ));
                assert_eq!(report.prepare.len(), 2);
                assert_eq!(
                    report.prepare[&PeerId::new(1)],
                    PrepareResponse::promise_with(4u64, "p")
                );
                assert_eq!(
                    report.prepare[&PeerId::new(2)],
                    PrepareResponse::promise_with(4u64, "q")
                );
                assert_eq!(report.state, ProposerState::Preparing);
                assert!(report.verdict.is_none());
                assert!(report.accept.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.report().is_some());
        assert!(gateway.accept_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_promise_without_prior_value_is_sent_accept() {
        // Acceptor replied with an accepted id but no value: a bare promise
        let gateway = Arc::new(
            ScriptedGateway::new()
                .on_prepare(1, PrepareResponse::promise())
                .on_accept(1, AcceptResponse::Accepted),
        );
        let use_case = RunProposalUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(1, &[1], "v")).await.unwrap();

        assert_eq!(gateway.accept_targets(), peers(&[1]));
        assert_eq!(report.promised(), peers(&[1]));
        assert_eq!(
            report.verdict,
            Some(Verdict::ConsensusReached {
                value: "v".to_string(),
                via: DecidedVia::Accept,
                progress: QuorumProgress::new(1, 1),
            })
        );
    }
}
