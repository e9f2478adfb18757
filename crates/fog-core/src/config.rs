//! Configuration loading for the fog of war.
//!
//! Settings are read from a TOML file; every field has a default so partial
//! files are accepted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::error::FogError;
use crate::fog::GridSettings;

/// Complete fog-of-war configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FogConfig {
    /// Grid resolution and world placement
    #[serde(default)]
    pub grid: GridSettings,
}

impl FogConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns the grid settings once they pass validation.
    pub fn validated(&self) -> Result<GridSettings, ConfigError> {
        self.grid.validate()?;
        Ok(self.grid)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] FogError),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Fog of War Configuration

[grid]
resolution = 128
world_size = 100.0
world_center = { x = 0.0, y = 0.0 }
"#
    .to_string()
}
