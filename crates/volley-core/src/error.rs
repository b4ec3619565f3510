//! Error types for configuration loading and spawn requests.
//!
//! None of these are fatal to a running simulation: callers log them and
//! skip the offending operation.

use thiserror::Error;

/// Errors that can occur when loading or validating a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured default attack preset does not exist.
    #[error("default attack preset '{0}' is not defined")]
    MissingDefaultPreset(String),

    /// A tuning value is outside its valid range.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: f64 },
}

/// Errors raised while turning a spawn request into an actor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("unknown enemy archetype '{0}'")]
    UnknownArchetype(String),
}
