//! Configuration file loading for paxos-proposer
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./paxos.toml` or `./.paxos.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/paxos-proposer/config.toml`
//! 4. Environment variables: `PAXOS_TRANSPORT__BASE_PORT=9000`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_PORT, DEFAULT_HOST, DEFAULT_SCHEME, DEFAULT_TIMEOUT_MS,
    FileClusterConfig, FileConfig, FileOutputConfig, FileOutputFormat, FileTransportConfig,
};
pub use loader::ConfigLoader;
