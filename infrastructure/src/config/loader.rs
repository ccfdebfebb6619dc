//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "paxos-proposer";
const PROJECT_FILES: [&str; 2] = ["paxos.toml", ".paxos.toml"];
const ENV_PREFIX: &str = "PAXOS_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./paxos.toml` or `./.paxos.toml`
    /// 3. XDG config: `$XDG_CONFIG_HOME/paxos-proposer/config.toml`
    /// 4. Environment: `PAXOS_SECTION__KEY`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            config_path.map(PathBuf::as_path),
            Self::project_config_path().as_deref(),
            Self::global_config_path().as_deref(),
        )?
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(
        explicit: Option<&Path>,
        project: Option<&Path>,
        global: Option<&Path>,
    ) -> Result<Figment, Box<figment::Error>> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = global.filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        // A missing explicit file is an error, not a silent fallback
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/paxos-proposer/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|filename| dir.join(filename))
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(config_path: Option<&PathBuf>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:<5}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project:  {}", path.display())),
            None => lines.push("  [     ] Project:  ./paxos.toml or ./.paxos.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:   {}", mark, path.display()));
        }

        let env_keys: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(ENV_PREFIX))
            .collect();
        if env_keys.is_empty() {
            lines.push(format!("  [     ] Env:      {}SECTION__KEY", ENV_PREFIX));
        } else {
            lines.push(format!("  [FOUND] Env:      {}", env_keys.join(", ")));
        }

        lines.push("  [     ] Default:  built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.cluster.pool_size.is_none());
        assert_eq!(config.transport.base_port, 8081);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("paxos-proposer"));
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("paxos.toml");
        let explicit = dir.path().join("custom.toml");
        fs::write(&project, "[cluster]\npool_size = 3\n[transport]\nbase_port = 9000\n").unwrap();
        fs::write(&explicit, "[transport]\nbase_port = 7000\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(&explicit), Some(&project), None)
            .unwrap()
            .extract()
            .unwrap();

        assert_eq!(config.cluster.pool_size, Some(3));
        assert_eq!(config.transport.base_port, 7000);
        assert_eq!(config.transport.timeout_ms, 1000);
    }

    #[test]
    fn test_project_file_overrides_global_file() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("config.toml");
        let project = dir.path().join(".paxos.toml");
        fs::write(&global, "[transport]\nhost = \"global\"\ntimeout_ms = 50\n").unwrap();
        fs::write(&project, "[transport]\nhost = \"project\"\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(None, Some(&project), Some(&global))
            .unwrap()
            .extract()
            .unwrap();

        assert_eq!(config.transport.host, "project");
        assert_eq!(config.transport.timeout_ms, 50);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        match ConfigLoader::figment(Some(&missing), None, None) {
            Ok(_) => panic!("missing explicit config should fail"),
            Err(err) => assert!(err.to_string().contains("nope.toml")),
        }
    }

    #[test]
    fn test_project_config_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::project_config_in(dir.path()).is_none());

        fs::write(dir.path().join(".paxos.toml"), "").unwrap();
        let found = ConfigLoader::project_config_in(dir.path()).unwrap();
        assert!(found.ends_with(".paxos.toml"));
    }
}
