//! Identifier policy configuration

use crate::id::IdManager;
use serde::{Deserialize, Serialize};
use std::path::Path;
use trav_core::ConfigError;

/// Id manager per element kind
///
/// ```toml
/// vertex_id_manager = "long"
/// edge_id_manager = "long"
/// vertex_property_id_manager = "uuid"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Vertex identifiers
    pub vertex_id_manager: IdManager,
    /// Edge identifiers
    pub edge_id_manager: IdManager,
    /// Vertex property identifiers
    pub vertex_property_id_manager: IdManager,
}

impl GraphConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same policy for every kind
    #[must_use]
    pub fn uniform(manager: IdManager) -> Self {
        Self {
            vertex_id_manager: manager,
            edge_id_manager: manager,
            vertex_property_id_manager: manager,
        }
    }

    /// With vertex policy
    #[inline]
    #[must_use]
    pub fn with_vertex_id_manager(mut self, manager: IdManager) -> Self {
        self.vertex_id_manager = manager;
        self
    }

    /// With edge policy
    #[inline]
    #[must_use]
    pub fn with_edge_id_manager(mut self, manager: IdManager) -> Self {
        self.edge_id_manager = manager;
        self
    }

    /// With vertex property policy
    #[inline]
    #[must_use]
    pub fn with_vertex_property_id_manager(mut self, manager: IdManager) -> Self {
        self.vertex_property_id_manager = manager;
        self
    }

    /// Parse TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` for unknown policies or malformed TOML.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`GraphConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_any() {
        assert_eq!(GraphConfig::new(), GraphConfig::uniform(IdManager::Any));
    }

    #[test]
    fn partial_toml() {
        let config = GraphConfig::from_toml_str(r#"edge_id_manager = "integer""#).unwrap();
        assert_eq!(config.edge_id_manager, IdManager::Integer);
        assert_eq!(config.vertex_id_manager, IdManager::Any);
    }

    #[test]
    fn unknown_policy_rejected() {
        let err = GraphConfig::from_toml_str(r#"vertex_id_manager = "short""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn builders() {
        let config = GraphConfig::new()
            .with_vertex_id_manager(IdManager::Long)
            .with_vertex_property_id_manager(IdManager::Uuid);
        assert_eq!(config.vertex_id_manager, IdManager::Long);
        assert_eq!(config.edge_id_manager, IdManager::Any);
        assert_eq!(config.vertex_property_id_manager, IdManager::Uuid);
    }
}
