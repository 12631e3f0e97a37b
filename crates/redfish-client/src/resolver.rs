//! Resource resolver: reference → absolute URL → typed record

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use redfish_core::ResourceReference;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ParseMode;
use crate::error::{RedfishError, Result};
use crate::transport::{Gateway, GatewayRequest, GatewayResponse};

/// Fetches resources through a [`Gateway`] and deserializes them
#[derive(Clone)]
pub struct ResourceResolver {
    gateway: Arc<dyn Gateway>,
    base_url: Url,
    parse_mode: ParseMode,
}

impl fmt::Debug for ResourceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceResolver")
            .field("base_url", &self.base_url.as_str())
            .field("parse_mode", &self.parse_mode)
            .finish_non_exhaustive()
    }
}

impl ResourceResolver {
    pub fn new(gateway: Arc<dyn Gateway>, base_url: Url, parse_mode: ParseMode) -> Self {
        Self {
            gateway,
            base_url,
            parse_mode,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn parse_mode(&self) -> ParseMode {
        self.parse_mode
    }

    /// Append a reference to the service URL
    ///
    /// References are absolute paths on the service, so they are appended to
    /// the base path rather than replacing it; a base of
    /// `https://gw/bmc1` keeps its `/bmc1` prefix.
    pub fn url_for(&self, reference: &ResourceReference) -> Result<Url> {
        let (path, query) = match reference.as_str().split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (reference.as_str(), None),
        };

        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(query);
        Ok(url)
    }

    /// Encode a request body as JSON
    pub fn encode<B: Serialize + ?Sized>(reference: &ResourceReference, body: &B) -> Result<Bytes> {
        serde_json::to_vec(body)
            .map(Bytes::from)
            .map_err(|e| RedfishError::parse(reference, e))
    }

    /// Issue one request and return the raw response
    pub async fn fetch(
        &self,
        method: Method,
        reference: &ResourceReference,
        body: Option<Bytes>,
    ) -> Result<GatewayResponse> {
        let url = self.url_for(reference)?;
        debug!(%method, %url, "Resolving resource");
        let response = self
            .gateway
            .execute(GatewayRequest { method, url, body })
            .await?;
        Ok(response)
    }

    /// GET a reference and deserialize it
    pub async fn resolve<T>(&self, reference: &ResourceReference) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.fetch(Method::GET, reference, None).await?;
        self.decode(reference, &response.body)
    }

    /// Send a JSON body with `method` and deserialize the response
    pub async fn send<B, T>(&self, method: Method, reference: &ResourceReference, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let payload = Self::encode(reference, body)?;
        let response = self.fetch(method, reference, Some(payload)).await?;
        self.decode(reference, &response.body)
    }

    /// Deserialize a body according to the parse mode
    ///
    /// An empty body decodes as `null`, which most record types reject; in
    /// permissive mode that yields the default record.
    pub fn decode<T>(&self, reference: &ResourceReference, body: &[u8]) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let parsed = if body.is_empty() {
            serde_json::from_slice(b"null")
        } else {
            serde_json::from_slice(body)
        };

        match (parsed, self.parse_mode) {
            (Ok(value), _) => Ok(value),
            (Err(e), ParseMode::Strict) => Err(RedfishError::parse(reference, e)),
            (Err(e), ParseMode::Permissive) => {
                warn!(%reference, error = %e, "Unparseable body, using default record");
                Ok(T::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockGateway, MockResponse};
    use redfish_core::{ManagerResource, SystemResource};

    fn resolver(mock: &Arc<MockGateway>, mode: ParseMode) -> ResourceResolver {
        let base = Url::parse("https://bmc.local").unwrap();
        ResourceResolver::new(mock.clone(), base, mode)
    }

    #[test]
    fn test_url_for_joins_absolute_reference() {
        let mock = Arc::new(MockGateway::new());
        let r = resolver(&mock, ParseMode::Strict);
        let url = r
            .url_for(&"/redfish/v1/Systems/System.Embedded.1".into())
            .unwrap();
        assert_eq!(url.as_str(), "https://bmc.local/redfish/v1/Systems/System.Embedded.1");
    }

    #[test]
    fn test_url_for_keeps_base_path_prefix() {
        let mock = Arc::new(MockGateway::new());
        for base in ["https://gw.test/bmc1", "https://gw.test/bmc1/"] {
            let r = ResourceResolver::new(mock.clone(), Url::parse(base).unwrap(), ParseMode::Strict);
            let url = r.url_for(&"/redfish/v1/Systems/1".into()).unwrap();
            assert_eq!(url.as_str(), "https://gw.test/bmc1/redfish/v1/Systems/1");
        }
    }

    #[test]
    fn test_url_for_keeps_query() {
        let mock = Arc::new(MockGateway::new());
        let r = resolver(&mock, ParseMode::Strict);
        let url = r
            .url_for(&"/redfish/v1/Managers/iDRAC.Embedded.1/Logs/Sel?$top=10".into())
            .unwrap();
        assert_eq!(url.path(), "/redfish/v1/Managers/iDRAC.Embedded.1/Logs/Sel");
        assert_eq!(url.query(), Some("$top=10"));
    }

    #[test]
    fn test_encode_unsized_body() {
        let body: &[u32] = &[1, 2];
        let bytes = ResourceResolver::encode(&"/x".into(), body).unwrap();
        assert_eq!(&bytes[..], b"[1,2]");
    }

    #[tokio::test]
    async fn test_resolve_typed_record() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get(
            "/redfish/v1/Managers/iDRAC.Embedded.1",
            MockResponse::json(r#"{"Id": "iDRAC.Embedded.1", "FirmwareVersion": "4.40.00.00"}"#),
        );
        let r = resolver(&mock, ParseMode::Strict);

        let manager: ManagerResource = r
            .resolve(&"/redfish/v1/Managers/iDRAC.Embedded.1".into())
            .await
            .unwrap();
        assert_eq!(manager.firmware_version, "4.40.00.00");
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_malformed_body() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get("/redfish/v1/Systems/1", MockResponse::json("{not json"));
        let r = resolver(&mock, ParseMode::Strict);

        let err = r
            .resolve::<SystemResource>(&"/redfish/v1/Systems/1".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RedfishError::Parse { ref reference, .. } if reference == "/redfish/v1/Systems/1"));
    }

    #[tokio::test]
    async fn test_permissive_mode_yields_default() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get("/redfish/v1/Systems/1", MockResponse::json("{not json"));
        let r = resolver(&mock, ParseMode::Permissive);

        let system: SystemResource = r.resolve(&"/redfish/v1/Systems/1".into()).await.unwrap();
        assert_eq!(system, SystemResource::default());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get("/redfish/v1/Systems/1", MockResponse::status(401));
        let r = resolver(&mock, ParseMode::Permissive);

        let err = r
            .resolve::<SystemResource>(&"/redfish/v1/Systems/1".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RedfishError::Transport(_)));
    }
}
