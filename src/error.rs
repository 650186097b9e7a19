//! Error types for pointswarm.
//!
//! The simulation itself has no failure path: degenerate geometry is guarded
//! and the step always completes. What can fail is getting a configuration
//! into memory and checking it makes sense.

use thiserror::Error;

/// Errors that can occur while loading or validating a [`crate::SwarmConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for a config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
