//! reqwest-backed gateway

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, trace};

use super::{check_status, Gateway, GatewayRequest, GatewayResponse, TransportError};
use crate::config::ClientConfig;

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// HTTP(S) gateway with optional basic auth
///
/// Management controllers commonly ship self-signed certificates, so
/// certificate checks can be disabled with `connection.insecure`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    credentials: Option<Credentials>,
}

impl HttpGateway {
    /// Build a gateway from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeouts.request_ms))
            .connect_timeout(Duration::from_millis(config.timeouts.connect_ms))
            .danger_accept_invalid_certs(config.connection.insecure)
            .build()?;

        let credentials = config
            .connection
            .username
            .as_ref()
            .map(|username| Credentials {
                username: username.clone(),
                password: config.connection.password.clone().unwrap_or_default(),
            });

        Ok(Self {
            client,
            credentials,
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(ACCEPT, "application/json");

        if let Some(ref creds) = self.credentials {
            builder = builder.basic_auth(&creds.username, Some(&creds.password));
        }

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(method = %request.method, url = %request.url, status, "Gateway response");
        trace!(bytes = body.len(), "Response body received");

        check_status(GatewayResponse {
            status,
            headers,
            body,
        })
    }
}
