use postgate_core::config::GateConfig;
use postgate_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hash key under which user id to username entries are cached.
pub const USERNAME_CACHE_KEY: &str = "cache:userId-username";

/// Router configuration.
///
/// ```toml
/// username_cache_key = "cache:userId-username"
///
/// [gate]
/// change_detection = "value"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct RouterConfig {
    pub username_cache_key: String,
    pub gate: GateConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            username_cache_key: USERNAME_CACHE_KEY.to_string(),
            gate: GateConfig::default(),
        }
    }
}

impl RouterConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.gate = self.gate.with_env_overrides()?;
        Ok(self)
    }
}
