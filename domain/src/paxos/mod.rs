//! Proposer decision logic for single-decree Paxos
//!
//! A proposal runs at most one round of each phase:
//!
//! ```text
//! select peers ──► Prepare ──► early decision? ──► choose value ──► Accept ──► verdict
//!                     │              │
//!                     │              └── yes ──► ConsensusReached(via Prepare)
//!                     └── no promises ──► NoPromises
//! ```
//!
//! Everything in this module is a pure fold over a [`ResponseSet`]: the
//! result never depends on the order in which responses arrived.

pub mod accept;
pub mod phase;
pub mod prepare;
pub mod report;
pub mod response;
pub mod state;
pub mod verdict;

pub use accept::{AcceptOutcome, accepted_peers, evaluate_accept};
pub use phase::Phase;
pub use prepare::{ChosenValue, PrepareOutcome, evaluate_prepare, promised_peers};
pub use report::{BroadcastReport, ProposalReport, StateReport};
pub use response::{AcceptResponse, AcceptedProposal, AcceptorState, PrepareResponse, ResponseSet};
pub use state::ProposerState;
pub use verdict::{DecidedVia, Verdict};
