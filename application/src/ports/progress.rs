//! Progress notification port
//!
//! Defines the interface for reporting progress during a proposal run.

use paxos_domain::{AcceptResponse, AcceptedProposal, Phase, PeerId, PrepareResponse};

/// Callback for progress updates during a proposal run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts, with the peers about to be contacted
    fn on_phase_start(&self, phase: Phase, peers: &[PeerId]);

    /// Called as each Prepare response (or its absence) is recorded
    fn on_prepare_response(&self, peer: PeerId, response: &PrepareResponse);

    /// Called as each Accept response (or its absence) is recorded
    fn on_accept_response(&self, peer: PeerId, response: &AcceptResponse);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: Phase);

    /// Called when a promise forces the proposer to adopt a prior value
    fn on_value_overridden(&self, _accepted: &AcceptedProposal) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: Phase, _peers: &[PeerId]) {}
    fn on_prepare_response(&self, _peer: PeerId, _response: &PrepareResponse) {}
    fn on_accept_response(&self, _peer: PeerId, _response: &AcceptResponse) {}
    fn on_phase_complete(&self, _phase: Phase) {}
}
