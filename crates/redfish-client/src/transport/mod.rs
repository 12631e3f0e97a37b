//! Transport gateway: one HTTP verb against one absolute URL
//!
//! The gateway is the only component that touches the network. Everything
//! above it (resolver, walker, poller) works on [`GatewayResponse`] values,
//! so tests can swap in [`crate::testing::MockGateway`].
//!
//! - [`HttpGateway`] - reqwest client with basic auth and optional
//!   certificate verification bypass
//! - [`crate::testing::MockGateway`] - scripted responses for tests

pub mod error;
mod http;

pub use error::TransportError;
pub use http::HttpGateway;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use url::Url;

/// A single request handed to the gateway
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub url: Url,
    /// JSON-encoded request body
    pub body: Option<Bytes>,
}

/// Raw successful response
#[derive(Debug, Clone, Default)]
pub struct GatewayResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes HTTP requests against the management service
///
/// Implementations return `Ok` only for 2xx responses; anything else is
/// mapped to a [`TransportError`] with [`check_status`].
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError>;
}

/// Turn a non-2xx response into the matching [`TransportError`]
pub fn check_status(response: GatewayResponse) -> Result<GatewayResponse, TransportError> {
    if response.is_success() {
        Ok(response)
    } else {
        let message = error_message(response.status, &response.body);
        Err(TransportError::from_status(response.status, message))
    }
}

/// Extract a human-readable message from a Redfish error body
///
/// Redfish errors look like
/// `{"error": {"message": ..., "@Message.ExtendedInfo": [{"Message": ...}]}}`.
fn error_message(status: u16, body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v["error"]["@Message.ExtendedInfo"][0]["Message"]
                .as_str()
                .or_else(|| v["error"]["message"].as_str())
        })
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_passes_success() {
        let resp = GatewayResponse::new(202, "{}");
        assert!(check_status(resp).is_ok());
    }

    #[test]
    fn test_error_message_prefers_extended_info() {
        let body = br#"{"error": {"message": "General error",
            "@Message.ExtendedInfo": [{"Message": "Unable to complete the operation because the resource was not found."}]}}"#;
        let err = check_status(GatewayResponse::new(404, Bytes::from_static(body))).unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 404,
                message: "Unable to complete the operation because the resource was not found."
                    .to_string()
            }
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let err = check_status(GatewayResponse::new(401, "<html>denied</html>")).unwrap_err();
        assert_eq!(err, TransportError::Unauthorized("HTTP 401".to_string()));
    }
}
