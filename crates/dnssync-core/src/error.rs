//! Error types for dnssync
//!
//! This module defines all error types used throughout the workspace.

use crate::record::RecordType;
use thiserror::Error;

/// Result type alias for dnssync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dnssync
#[derive(Error, Debug)]
pub enum Error {
    /// Network failure or non-2xx response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("Unexpected response data: {0}")]
    Data(String),

    /// The provider answered, but reported a failure
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message (raw provider response where available)
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The old value of a replaced record was removed but the new one
    /// could not be added. The record stays absent until the next run.
    #[error("Replace of {name} ({record_type}) interrupted after removal: {source}")]
    ReplaceInterrupted {
        /// Record name
        name: String,
        /// Record type
        record_type: RecordType,
        /// The add failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a data error
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Create a provider-reported error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Text suitable for quoting back to an operator.
    ///
    /// For provider-reported failures this is the provider's own response,
    /// for everything else the rendered error.
    pub fn detail(&self) -> String {
        match self {
            Error::Provider { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
