//! Domain layer for paxos-proposer
//!
//! This crate contains the proposer-side decision core of single-decree
//! Paxos. It has no dependencies on transport, configuration, or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Quorum
//!
//! A value is chosen once a majority of the *whole* acceptor pool has
//! accepted it. [`quorum::majority`] is the only quorum rule.
//!
//! ## Proposal round
//!
//! - **Prepare**: collect promises, adopt the highest previously accepted
//!   value, and detect values a majority already accepted
//! - **Accept**: ask the promised peers to accept the chosen value
//!
//! Each run performs one Prepare round and at most one Accept round.

pub mod cluster;
pub mod config;
pub mod core;
pub mod paxos;
pub mod quorum;

// Re-export commonly used types
pub use cluster::{ContactPlan, PeerPool};
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    ids::{PeerId, ProposalId},
};
pub use paxos::{
    AcceptOutcome, AcceptResponse, AcceptedProposal, AcceptorState, BroadcastReport, ChosenValue,
    DecidedVia, Phase, PrepareOutcome, PrepareResponse, ProposalReport, ProposerState,
    ResponseSet, StateReport, Verdict,
};
pub use quorum::{QuorumProgress, majority};
