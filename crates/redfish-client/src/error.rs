//! Error types for Redfish client operations

use redfish_core::VersionError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Result type alias for Redfish client operations
pub type Result<T> = std::result::Result<T, RedfishError>;

/// Errors that can occur during Redfish client operations
#[derive(Error, Debug)]
pub enum RedfishError {
    /// Gateway failed (network, auth, non-2xx status)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Reference could not be joined onto the service host
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body did not match the expected shape (strict mode)
    #[error("Failed to parse {reference}: {message}")]
    Parse { reference: String, message: String },

    /// Firmware version string is malformed
    #[error("Invalid firmware version: {0}")]
    VersionParse(String),

    /// No schema rule covers the firmware version
    #[error("Unsupported firmware version: {0}")]
    UnsupportedVersion(String),

    /// Asynchronous action was rejected or did not yield a task handle
    #[error("Task submission failed: {message}")]
    Submission {
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// Task did not reach a terminal state within the poll policy
    #[error("Timed out waiting for {operation} after {polls} poll(s)")]
    Timeout { operation: String, polls: u32 },

    /// Poll loop was cancelled by the caller
    #[error("Cancelled while waiting for {0}")]
    Cancelled(String),

    /// Action response carried no `@Message.ExtendedInfo` entry
    #[error("Response from {0} carried no message")]
    MissingMessage(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RedfishError {
    /// Create a parse error for a resource reference
    pub fn parse(reference: impl ToString, message: impl ToString) -> Self {
        Self::Parse {
            reference: reference.to_string(),
            message: message.to_string(),
        }
    }

    /// HTTP status behind the error, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Submission {
                source: Some(e), ..
            } => e.status(),
            _ => None,
        }
    }
}

impl From<VersionError> for RedfishError {
    fn from(err: VersionError) -> Self {
        match err {
            VersionError::Parse(v) | VersionError::InvalidConstraint(v) => Self::VersionParse(v),
            VersionError::Unsupported(v) => Self::UnsupportedVersion(v),
        }
    }
}

impl From<ConfigError> for RedfishError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
