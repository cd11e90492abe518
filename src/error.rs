//! Error types for match setup and configuration loading

use thiserror::Error;

/// Errors surfaced by the simulation boundary.
#[derive(Error, Debug)]
pub enum SimError {
    /// Field size or match configuration cannot produce a playable match.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read or written.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
