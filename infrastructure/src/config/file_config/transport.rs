//! Transport configuration from TOML (`[transport]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_BASE_PORT: u16 = 8081;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Raw transport configuration from TOML
///
/// Peer `p` listens on `base_port + p - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTransportConfig {
    pub host: String,
    pub scheme: String,
    pub base_port: u16,
    /// Bound on each acceptor request, in milliseconds
    pub timeout_ms: u64,
}

impl Default for FileTransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            base_port: DEFAULT_BASE_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
