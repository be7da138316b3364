//! Gate configuration.
//!
//! Loaded from TOML, with environment overrides applied on top:
//!
//! ```toml
//! change_detection = "value"   # or "identity"
//! catch_panics = true
//! trace_fetches = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`GateConfig::change_detection`].
pub const CHANGE_DETECTION_ENV: &str = "POSTGATE_CHANGE_DETECTION";

/// How the gate decides that a dependency's resolved value has changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ChangeDetection {
    /// Every new resolution counts as a change (pointer comparison).
    Identity,
    /// Only a resolution that is not `PartialEq`-equal counts as a change.
    #[default]
    Value,
}

impl std::str::FromStr for ChangeDetection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "reference" => Ok(Self::Identity),
            "value" | "deep" => Ok(Self::Value),
            _ => Err(ConfigError::Env {
                variable: CHANGE_DETECTION_ENV,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct GateConfig {
    pub change_detection: ChangeDetection,
    /// Turn a panicking fetch into a failed slot instead of unwinding
    /// through the caller.
    pub catch_panics: bool,
    /// Wrap every fetch in a [`Traced`](crate::telemetry::Traced) span.
    pub trace_fetches: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            change_detection: ChangeDetection::Value,
            catch_panics: true,
            trace_fetches: false,
        }
    }
}

impl GateConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var(CHANGE_DETECTION_ENV) {
            self.change_detection = value.parse()?;
        }
        Ok(self)
    }

    pub fn with_change_detection(mut self, mode: ChangeDetection) -> Self {
        self.change_detection = mode;
        self
    }

    pub fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    pub fn with_trace_fetches(mut self, enabled: bool) -> Self {
        self.trace_fetches = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = GateConfig::from_toml_str("").unwrap();
        assert_eq!(config, GateConfig::default());
        assert_eq!(config.change_detection, ChangeDetection::Value);
    }

    #[test]
    fn test_partial_toml() {
        let config = GateConfig::from_toml_str("change_detection = \"identity\"").unwrap();
        assert_eq!(config.change_detection, ChangeDetection::Identity);
        assert!(config.catch_panics);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(GateConfig::from_toml_str("change_detection = \"fuzzy\"").is_err());
        assert!("fuzzy".parse::<ChangeDetection>().is_err());
        assert_eq!(
            "Reference".parse::<ChangeDetection>().unwrap(),
            ChangeDetection::Identity
        );
    }
}
