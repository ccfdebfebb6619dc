//! Application layer for paxos-proposer
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    acceptor_gateway::{AcceptorGateway, GatewayError},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::broadcast::{BroadcastInput, BroadcastMessage, BroadcastUseCase};
pub use use_cases::query_state::QueryStateUseCase;
pub use use_cases::run_proposal::{RunProposalError, RunProposalInput, RunProposalUseCase};
