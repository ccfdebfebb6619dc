//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod cluster;
mod output;
mod transport;

pub use cluster::FileClusterConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use transport::{
    DEFAULT_BASE_PORT, DEFAULT_HOST, DEFAULT_SCHEME, DEFAULT_TIMEOUT_MS, FileTransportConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("transport.base_port cannot be 0")]
    ZeroBasePort,

    #[error("transport.timeout_ms cannot be 0")]
    ZeroTimeout,

    #[error("cluster.pool_size cannot be 0")]
    ZeroPoolSize,

    #[error("transport.host cannot be empty")]
    EmptyHost,

    #[error("transport.scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("pool of {pool_size} peers starting at port {base_port} exceeds port 65535")]
    PortOverflow { base_port: u16, pool_size: usize },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Acceptor pool settings
    pub cluster: FileClusterConfig,
    /// How acceptors are reached
    pub transport: FileTransportConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every issue found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        self.validate_for_pool(self.cluster.pool_size)
    }

    /// Validate against the pool size that will actually be used
    ///
    /// The command line may override `cluster.pool_size`, so port ranges are
    /// checked against `pool_size` rather than the configured value.
    pub fn validate_for_pool(&self, pool_size: Option<usize>) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        let transport = &self.transport;

        if transport.base_port == 0 {
            issues.push(ConfigValidationError::ZeroBasePort);
        }
        if transport.timeout_ms == 0 {
            issues.push(ConfigValidationError::ZeroTimeout);
        }
        if transport.host.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyHost);
        }
        if !matches!(transport.scheme.as_str(), "http" | "https") {
            issues.push(ConfigValidationError::UnsupportedScheme(
                transport.scheme.clone(),
            ));
        }

        match pool_size {
            Some(0) => issues.push(ConfigValidationError::ZeroPoolSize),
            Some(size) => {
                let last_port = usize::from(transport.base_port) + size - 1;
                if last_port > usize::from(u16::MAX) {
                    issues.push(ConfigValidationError::PortOverflow {
                        base_port: transport.base_port,
                        pool_size: size,
                    });
                }
            }
            None => {}
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paxos_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[cluster]
pool_size = 5

[transport]
host = "10.0.0.2"
scheme = "https"
base_port = 7000
timeout_ms = 250

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cluster.pool_size, Some(5));
        assert_eq!(config.transport.host, "10.0.0.2");
        assert_eq!(config.transport.scheme, "https");
        assert_eq!(config.transport.base_port, 7000);
        assert_eq!(config.transport.timeout_ms, 250);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.cluster.pool_size.is_none());
        assert_eq!(config.transport.base_port, 8081);
        assert_eq!(config.transport.timeout_ms, 1000);
        assert!(config.output.color);
        assert!(config.output.show_progress);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.transport.base_port = 0;
        config.transport.timeout_ms = 0;
        config.cluster.pool_size = Some(0);

        let issues = config.validate();
        assert_eq!(
            issues,
            vec![
                ConfigValidationError::ZeroBasePort,
                ConfigValidationError::ZeroTimeout,
                ConfigValidationError::ZeroPoolSize,
            ]
        );
    }

    #[test]
    fn test_validate_port_overflow() {
        let mut config = FileConfig::default();
        config.transport.base_port = 65530;

        assert!(config.validate_for_pool(Some(6)).is_empty());
        assert_eq!(
            config.validate_for_pool(Some(7)),
            vec![ConfigValidationError::PortOverflow {
                base_port: 65530,
                pool_size: 7,
            }]
        );
    }

    #[test]
    fn test_validate_scheme() {
        let mut config = FileConfig::default();
        config.transport.scheme = "ftp".to_string();
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::UnsupportedScheme("ftp".to_string())]
        );
    }
}
