//! Cluster configuration from TOML (`[cluster]` section)

use serde::{Deserialize, Serialize};

/// Raw cluster configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClusterConfig {
    /// Number of acceptors; the command line overrides it
    pub pool_size: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;

    #[test]
    fn test_pool_size_deserialize() {
        let config: FileConfig = toml::from_str("[cluster]\npool_size = 5\n").unwrap();
        assert_eq!(config.cluster.pool_size, Some(5));
    }
}
