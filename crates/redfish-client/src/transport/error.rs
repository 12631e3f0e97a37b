//! Transport layer errors

use thiserror::Error;

/// Failure at the gateway boundary: network, TLS, auth or HTTP status
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized(message),
            400 => Self::BadRequest(message),
            500 => Self::ServerError(message),
            _ => Self::Status { status, message },
        }
    }

    /// HTTP status behind this error, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::BadRequest(_) => Some(400),
            Self::ServerError(_) => Some(500),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_builder() {
            Self::InvalidConfig(err.to_string())
        } else if err.is_decode() || err.is_body() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            TransportError::from_status(401, "nope"),
            TransportError::Unauthorized(_)
        ));
        assert!(matches!(
            TransportError::from_status(400, "bad"),
            TransportError::BadRequest(_)
        ));
        assert!(matches!(
            TransportError::from_status(500, "boom"),
            TransportError::ServerError(_)
        ));
        assert_eq!(TransportError::from_status(404, "gone").status(), Some(404));
    }
}
