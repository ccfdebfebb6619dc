//! Infrastructure layer for paxos-proposer
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileClusterConfig, FileConfig, FileOutputConfig,
    FileOutputFormat, FileTransportConfig,
};
pub use http::{
    endpoint::PeerAddressing,
    error::{HttpError, Result},
    gateway::HttpAcceptorGateway,
};
