//! Error taxonomy for the gate.
//!
//! Configuration mistakes fail fast at registration, fetch errors stay local
//! to their slot, and query errors surface programmer mistakes immediately.

use crate::slot::SlotKey;
use std::sync::Arc;
use thiserror::Error;

/// A slot set that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("slot `{0}` is registered more than once")]
    DuplicateSlot(SlotKey),

    #[error("slot `{slot}` depends on undeclared slot `{dependency}`")]
    UndeclaredDependency { slot: SlotKey, dependency: SlotKey },

    #[error("dependency cycle among slots: {}", .path.join(" -> "))]
    Cycle { path: Vec<SlotKey> },
}

/// Errors returned by the gate itself (never by a fetch).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("no slot named `{0}`")]
    UnknownSlot(SlotKey),

    #[error("slot `{0}` has not resolved")]
    NotResolved(SlotKey),

    #[error("slot `{slot}` does not hold a value of type `{expected}` (found `{found}`)")]
    TypeMismatch {
        slot: SlotKey,
        expected: &'static str,
        found: &'static str,
    },

    #[error("slot `{0}` is running; wait for it to settle before overriding its value")]
    SlotBusy(SlotKey),
}

/// Failure of a single fetch. Stored on the slot, never propagated.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("{0}")]
    Failed(String),

    #[error("input `{0}` is not available")]
    MissingInput(SlotKey),

    #[error("fetch panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Source(Arc<anyhow::Error>),
}

impl FetchError {
    pub fn msg(message: impl Into<String>) -> Self {
        FetchError::Failed(message.into())
    }
}

impl From<anyhow::Error> for FetchError {
    fn from(err: anyhow::Error) -> Self {
        FetchError::Source(Arc::new(err))
    }
}

/// Invalid gate or router configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value `{value}` for {variable}")]
    Env { variable: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = ConfigurationError::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle among slots: a -> b -> a");
    }

    #[test]
    fn test_anyhow_source_is_transparent() {
        let err: FetchError = anyhow::anyhow!("redis unavailable").into();
        assert_eq!(err.to_string(), "redis unavailable");
    }
}
