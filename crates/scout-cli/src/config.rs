//! CLI configuration.
//!
//! Resolved in layers, later layers winning: built-in defaults, an optional
//! YAML file (`--config`), environment variables, then command-line flags.
//!
//! ```yaml
//! data_dir: /var/lib/scout
//! schema: forms/season.yaml
//! io_timeout_ms: 2000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "SCOUT_DATA_DIR";
/// Environment variable overriding the active schema document.
pub const ENV_SCHEMA: &str = "SCOUT_SCHEMA";
/// Environment variable overriding the I/O timeout in milliseconds.
pub const ENV_IO_TIMEOUT_MS: &str = "SCOUT_IO_TIMEOUT_MS";

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoutConfig {
    /// Directory holding `saved-matches/`.
    pub data_dir: PathBuf,
    /// Active schema document (JSON or YAML).
    pub schema: Option<PathBuf>,
    /// Bound on each storage step, in milliseconds.
    pub io_timeout_ms: u64,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            schema: None,
            io_timeout_ms: 5000,
        }
    }
}

impl ScoutConfig {
    /// Defaults, then `file` if given, then the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|var| std::env::var(var).ok())
    }

    /// Parse a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(schema) = lookup(ENV_SCHEMA).filter(|v| !v.is_empty()) {
            self.schema = Some(PathBuf::from(schema));
        }
        if let Some(raw) = lookup(ENV_IO_TIMEOUT_MS).filter(|v| !v.is_empty()) {
            self.io_timeout_ms = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_IO_TIMEOUT_MS,
                value: raw,
            })?;
        }
        Ok(self)
    }

    /// Apply command-line overrides.
    pub fn with_flags(mut self, data_dir: Option<PathBuf>, schema: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(schema) = schema {
            self.schema = Some(schema);
        }
        self
    }

    /// The storage timeout as a duration.
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
    #[error("invalid config {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = ScoutConfig::default().with_env(env(&[])).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("."));
        assert_eq!(cfg.schema, None);
        assert_eq!(cfg.io_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn file_then_env_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.yaml");
        std::fs::write(&path, "data_dir: /from/file\nschema: file.json\nio_timeout_ms: 100\n")
            .unwrap();

        let cfg = ScoutConfig::from_file(&path).unwrap();
        assert_eq!(cfg.io_timeout_ms, 100);

        let cfg = cfg
            .with_env(env(&[(ENV_DATA_DIR, "/from/env")]))
            .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/from/env"));
        assert_eq!(cfg.schema, Some(PathBuf::from("file.json")));

        let cfg = cfg.with_flags(None, Some(PathBuf::from("flag.yaml")));
        assert_eq!(cfg.data_dir, PathBuf::from("/from/env"));
        assert_eq!(cfg.schema, Some(PathBuf::from("flag.yaml")));
    }

    #[test]
    fn bad_timeout_env_rejected() {
        let err = ScoutConfig::default()
            .with_env(env(&[(ENV_IO_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.yaml");
        std::fs::write(&path, "data_directory: x\n").unwrap();
        assert!(matches!(
            ScoutConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
