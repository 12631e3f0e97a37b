//! Redfish Client Library
//!
//! Typed async client for the Redfish REST interface of server management
//! controllers (Dell iDRAC resource naming by default).
//!
//! # Example
//!
//! ```rust,no_run
//! use redfish_client::{ClientConfig, RedfishClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::builder("https://10.0.0.5")
//!         .credentials("root", "calvin")
//!         .insecure(true)
//!         .build();
//!     let client = RedfishClient::connect(config)?;
//!
//!     // One GET
//!     let system = client.system_info().await?;
//!
//!     // Collection walk + rollup
//!     let psus = client.power_health().await?;
//!
//!     // Layout chosen from the controller's firmware version
//!     let sel = client.system_event_logs_auto().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Layers
//!
//! - [`transport`] - the [`Gateway`] trait and the reqwest-backed [`HttpGateway`]
//! - [`ResourceResolver`] - reference → URL → typed record, strict or permissive
//! - [`CollectionWalker`] - resolves every member of a collection, in order
//! - [`aggregate`] - folds categories of records into one rollup
//! - [`TaskPoller`] - submit, take the `Location` handle, poll to completion
//!
//! # Testing
//!
//! ```rust,ignore
//! use redfish_client::testing::{mock_client, MockGateway, MockResponse};
//!
//! let mock = Arc::new(MockGateway::new());
//! mock.on_get("/redfish/v1/Systems/System.Embedded.1", MockResponse::json(body));
//! let client = mock_client(mock.clone())?;
//! ```

pub mod aggregate;
mod client;
pub mod config;
mod error;
mod resolver;
pub mod task;
pub mod testing;
pub mod transport;
mod walker;

pub use client::RedfishClient;
pub use config::{AttributeTarget, ClientConfig, ClientConfigBuilder, ConfigError, ParseMode};
pub use error::{RedfishError, Result};
pub use resolver::ResourceResolver;
pub use task::{PollPolicy, TaskPoller};
pub use transport::{Gateway, GatewayRequest, GatewayResponse, HttpGateway, TransportError};
pub use walker::{CollectionWalker, MemberFilter};

// Re-export core types for convenience
pub use redfish_core::models::{
    event_log_rules, AccountRecord, AccountResource, AttributesResource, BootSequence, BootSource,
    BootSourcesResource, CollectionEnvelope, ConfigAttribute, ConfigComponent, DriveResource,
    EthernetInterfaceResource, EventLogEntry, EventLogEntryV1, EventLogEntryV2, EventLogV1,
    EventLogV2, ExportConfigResponse, ExportRequest, ExportTarget, ExtendedInfo, FirmwareRecord,
    FirmwareResource, HealthRecord, JobStatus, Link, LogLayout, ManagerResource, MemberValue,
    MemorySummary, MessageResponse, NetworkInterfaceRecord, PowerResource, PowerSupply,
    ProcessorResource, ProcessorSummary, Redundancy, ResourceReference, Sensor, ShareParameters,
    Status, StorageRecord, StorageResource, Summarize, SystemConfiguration, SystemResource,
    SystemSummary, TaskHandle, TaskOutcome, TaskState, TaskStatus, ThermalResource, Vlan,
};
pub use redfish_core::{
    select_schema, Comparator, FirmwareVersion, SchemaRule, SchemaRules, VersionConstraint,
    VersionError, VersionResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_items_reexported_by_name() {
        let layout = select_schema("3.15.17.15", &event_log_rules()).unwrap();
        assert_eq!(layout, LogLayout::V1);

        let err: RedfishError = VersionError::Unsupported("0.1".to_string()).into();
        assert!(matches!(err, RedfishError::UnsupportedVersion(_)));
        assert!(TaskState::default().as_str().is_empty());
    }
}
