//! Machine configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How assembled programs are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Inputs evaluated one after another on the calling thread
    #[default]
    Serial,
    /// Independent inputs evaluated on a worker pool
    Parallel,
}

/// Machine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Evaluation strategy for compiled programs
    pub strategy: Strategy,
    /// Pool size for [`Strategy::Parallel`]
    pub worker_threads: usize,
}

impl MachineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With evaluation strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// With worker pool size
    #[inline]
    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` or `ConfigError::Invalid`.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`MachineConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` when `worker_threads` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid("worker_threads must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Serial,
            worker_threads: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = MachineConfig::new();
        assert_eq!(config.strategy, Strategy::Serial);
        assert_eq!(config.worker_threads, 4);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = MachineConfig::from_toml_str("strategy = \"parallel\"").unwrap();
        assert_eq!(config.strategy, Strategy::Parallel);
        assert_eq!(config.worker_threads, 4);
    }

    #[test]
    fn zero_workers_rejected() {
        let err = MachineConfig::from_toml_str("worker_threads = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_strategy_rejected() {
        let err = MachineConfig::from_toml_str("strategy = \"eager\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strategy = \"parallel\"\nworker_threads = 2").unwrap();
        let config = MachineConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config,
            MachineConfig::new()
                .with_strategy(Strategy::Parallel)
                .with_worker_threads(2)
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MachineConfig::from_file("/nonexistent/trav.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
