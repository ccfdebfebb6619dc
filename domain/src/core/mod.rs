//! Core domain concepts shared across all subdomains.
//!
//! - [`ids::ProposalId`] / [`ids::PeerId`] - identifiers used on the wire
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod ids;
