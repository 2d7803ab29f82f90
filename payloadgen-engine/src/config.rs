//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{EngineError, EngineResult};

/// Configuration for the CRUD engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Payload key naming the target entity.
    pub entity_key: String,
    /// Payload key holding the record data.
    pub data_key: String,
    /// Reject payload keys the target type does not declare.
    pub strict_keys: bool,
    /// Page size used by paged finds when the request has none.
    pub default_page_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entity_key: "entity".to_string(),
            data_key: "data".to_string(),
            strict_keys: false,
            default_page_size: 10,
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.default_page_size == 0 {
            return Err(EngineError::Config(
                "default_page_size must be greater than 0".to_string(),
            ));
        }
        if self.entity_key.is_empty() || self.data_key.is_empty() {
            return Err(EngineError::Config("payload keys cannot be empty".to_string()));
        }
        if self.entity_key == self.data_key {
            return Err(EngineError::Config(format!(
                "entity_key and data_key are both '{}'",
                self.entity_key
            )));
        }
        Ok(())
    }
}
