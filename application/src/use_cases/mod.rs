//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod broadcast;
pub mod query_state;
pub mod run_proposal;
pub(crate) mod shared;
