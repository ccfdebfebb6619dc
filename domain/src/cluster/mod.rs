//! Acceptor pool and peer selection

pub mod pool;

pub use pool::{ContactPlan, PeerPool};
