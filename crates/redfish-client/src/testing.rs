//! Test utilities for redfish-client
//!
//! - [`MockGateway`] - in-memory [`Gateway`] with scripted responses per route
//! - [`TestServer`] - axum router on an ephemeral port with a connected client

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tokio::net::TcpListener;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::transport::{check_status, Gateway, GatewayRequest, GatewayResponse, TransportError};
use crate::{RedfishClient, Result};

// =============================================================================
// MockGateway
// =============================================================================

/// Canned response served by [`MockGateway`]
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl MockResponse {
    /// 200 with a JSON body
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Bytes::from(body.into()),
        }
    }

    /// 200 with a serialized JSON value
    pub fn value(value: &serde_json::Value) -> Self {
        Self::json(value.to_string())
    }

    /// Empty body with the given status
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn to_response(&self) -> GatewayResponse {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.append(name, value);
            }
        }
        GatewayResponse {
            status: self.status,
            headers,
            body: self.body.clone(),
        }
    }
}

/// Request observed by [`MockGateway`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Scripted gateway keyed by `(method, path)`
///
/// Each route holds a queue of responses. Responses are consumed in order
/// and the last one repeats, so a route scripted `[Running, Running, Done]`
/// answers `Done` from the third call on. Unscripted routes answer 404.
#[derive(Debug, Default)]
pub struct MockGateway {
    routes: Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method` on `path`
    pub fn on(&self, method: Method, path: &str, response: MockResponse) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    pub fn on_get(&self, path: &str, response: MockResponse) -> &Self {
        self.on(Method::GET, path, response)
    }

    pub fn on_post(&self, path: &str, response: MockResponse) -> &Self {
        self.on(Method::POST, path, response)
    }

    pub fn on_patch(&self, path: &str, response: MockResponse) -> &Self {
        self.on(Method::PATCH, path, response)
    }

    pub fn on_delete(&self, path: &str, response: MockResponse) -> &Self {
        self.on(Method::DELETE, path, response)
    }

    /// Serve `members` as a collection at `path`
    pub fn on_collection(&self, path: &str, members: &[&str]) -> &Self {
        let links: Vec<serde_json::Value> = members
            .iter()
            .map(|m| serde_json::json!({ "@odata.id": m }))
            .collect();
        self.on_get(
            path,
            MockResponse::value(&serde_json::json!({
                "Members": links,
                "Members@odata.count": members.len(),
            })),
        )
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of requests made with `method` to `path`
    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }

    fn next_response(&self, method: &Method, path: &str) -> Option<MockResponse> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(&(method.clone(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn execute(&self, request: GatewayRequest) -> std::result::Result<GatewayResponse, TransportError> {
        let path = request.url.path().to_string();
        let body = request
            .body
            .as_ref()
            .and_then(|b| serde_json::from_slice(b).ok());

        self.requests.lock().push(RecordedRequest {
            method: request.method.clone(),
            path: path.clone(),
            body,
        });

        let response = match self.next_response(&request.method, &path) {
            Some(scripted) => scripted.to_response(),
            None => GatewayResponse::new(
                404,
                format!(r#"{{"error": {{"message": "No route for {} {}"}}}}"#, request.method, path),
            ),
        };
        check_status(response)
    }
}

// =============================================================================
// TestServer
// =============================================================================

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: RedfishClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` and connect a client with test-friendly timeouts
    ///
    /// # Example
    ///
    /// ```ignore
    /// use redfish_client::testing::TestServer;
    ///
    /// let server = TestServer::start(mock_bmc_router()).await?;
    /// let summary = server.client.system_info().await?;
    /// ```
    pub async fn start<S>(router: axum::Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        Self::start_with(router, |builder| builder).await
    }

    /// Serve `router`, adjusting the client configuration before connecting
    pub async fn start_with<S, F>(router: axum::Router<S>, configure: F) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
        F: FnOnce(ClientConfigBuilder) -> ClientConfigBuilder,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: axum::Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let builder = ClientConfig::builder(format!("http://{}", addr))
            .request_timeout_ms(5_000)
            .task_poll_ms(10)
            .task_timeout_ms(Some(5_000));
        let client = RedfishClient::connect(configure(builder).build())?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &RedfishClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Client over a [`MockGateway`] with default iDRAC resource ids
pub fn mock_client(gateway: Arc<MockGateway>) -> Result<RedfishClient> {
    mock_client_with(gateway, |builder| builder)
}

/// Client over a [`MockGateway`], adjusting the configuration first
pub fn mock_client_with<F>(gateway: Arc<MockGateway>, configure: F) -> Result<RedfishClient>
where
    F: FnOnce(ClientConfigBuilder) -> ClientConfigBuilder,
{
    let builder = ClientConfig::builder("https://bmc.test").task_poll_ms(1);
    RedfishClient::with_gateway(configure(builder).build(), gateway)
}
