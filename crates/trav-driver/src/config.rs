//! Driver configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use trav_core::ConfigError;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Endpoint path
    pub path: String,
    /// Handshake window in milliseconds
    pub handshake_timeout_ms: u64,
}

impl DriverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With host and port
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// With handshake window
    #[inline]
    #[must_use]
    pub fn with_handshake_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.handshake_timeout_ms = timeout_ms;
        self
    }

    /// Handshake window
    #[inline]
    #[must_use]
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    /// Endpoint URL
    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{}:{}{}", self.host, self.port, self.path)
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
    /// [`DriverConfig::from_toml_str`].
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
    /// `ConfigError::Invalid` for an empty host or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".into()));
        }
        if self.handshake_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "handshake_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8182,
            path: "/gremlin".to_string(),
            handshake_timeout_ms: 15_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DriverConfig::new();
        assert_eq!(config.url(), "ws://localhost:8182/gremlin");
        assert_eq!(config.handshake_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn partial_toml() {
        let config = DriverConfig::from_toml_str("handshake_timeout_ms = 100").unwrap();
        assert_eq!(config.handshake_timeout_ms, 100);
        assert_eq!(config.port, 8182);
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = DriverConfig::from_toml_str("handshake_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn builder() {
        let config = DriverConfig::new()
            .with_endpoint("db.internal", 9000)
            .with_handshake_timeout_ms(250);
        assert_eq!(config.url(), "ws://db.internal:9000/gremlin");
        assert_eq!(config.handshake_timeout(), Duration::from_millis(250));
    }
}
