//! Redfish client implementation

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use redfish_core::{
    event_log_rules, select_schema, AccountRecord, AccountResource, AttributesResource,
    BootSource, BootSourcesResource, DriveResource, EthernetInterfaceResource, EventLogEntry,
    EventLogV1, EventLogV2, ExportConfigResponse, ExportRequest, ExportTarget, FirmwareRecord,
    FirmwareResource, HealthRecord, JobStatus, LogLayout, ManagerResource, MessageResponse,
    NetworkInterfaceRecord, PowerResource, ProcessorResource, ResourceReference, StorageRecord,
    StorageResource, Summarize, SystemResource, SystemSummary, TaskOutcome, ThermalResource,
};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::aggregate::{power_rollup, storage_rollup, thermal_rollup, Aggregator};
use crate::config::{AttributeTarget, ClientConfig};
use crate::error::{RedfishError, Result};
use crate::resolver::ResourceResolver;
use crate::task::TaskPoller;
use crate::transport::{Gateway, HttpGateway};
use crate::walker::{CollectionWalker, MemberFilter};

/// Client for a Redfish management service
///
/// Cheap to clone; clones share the gateway and configuration.
#[derive(Debug, Clone)]
pub struct RedfishClient {
    config: Arc<ClientConfig>,
    resolver: ResourceResolver,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResetRequest<'a> {
    reset_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttributesPatch<'a> {
    attributes: &'a BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct JobRequest<'a> {
    #[serde(rename = "TargetSettingsURI")]
    target_settings_uri: &'a ResourceReference,
}

impl RedfishClient {
    /// Connect to `base_url` with default settings and basic auth
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        Self::connect(
            ClientConfig::builder(base_url)
                .credentials(username, password)
                .build(),
        )
    }

    /// Build a client over the default HTTP gateway
    pub fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let gateway = HttpGateway::new(&config)?;
        Self::with_gateway(config, Arc::new(gateway))
    }

    /// Build a client over a caller-supplied gateway
    pub fn with_gateway(config: ClientConfig, gateway: Arc<dyn Gateway>) -> Result<Self> {
        let base_url = Url::parse(&config.connection.base_url)?;
        let resolver = ResourceResolver::new(gateway, base_url, config.parse_mode);
        Ok(Self {
            config: Arc::new(config),
            resolver,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    pub fn base_url(&self) -> &Url {
        self.resolver.base_url()
    }

    fn walker(&self) -> CollectionWalker<'_> {
        CollectionWalker::new(&self.resolver, self.config.walk.concurrency)
    }

    fn poller(&self) -> TaskPoller<'_> {
        TaskPoller::new(&self.resolver, self.config.poll_policy())
    }

    // =========================================================================
    // System
    // =========================================================================

    /// Condensed view of the computer system
    #[instrument(skip(self))]
    pub async fn system_info(&self) -> Result<SystemSummary> {
        let system: SystemResource = self.resolver.resolve(&self.config.system_path()).await?;
        Ok(system.summarize())
    }

    /// Current power state (`On`, `Off`, ...)
    #[instrument(skip(self))]
    pub async fn power_state(&self) -> Result<String> {
        let system: SystemResource = self.resolver.resolve(&self.config.system_path()).await?;
        Ok(system.power_state)
    }

    /// Verify the credentials by reading the system; returns its health
    #[instrument(skip(self))]
    pub async fn check_login(&self) -> Result<String> {
        let system: SystemResource = self.resolver.resolve(&self.config.system_path()).await?;
        Ok(system.status.health_str().to_string())
    }

    /// Firmware version of the management controller
    #[instrument(skip(self))]
    pub async fn manager_firmware_version(&self) -> Result<String> {
        let manager: ManagerResource = self.resolver.resolve(&self.config.manager_path()).await?;
        debug!(version = %manager.firmware_version, "Manager firmware");
        Ok(manager.firmware_version)
    }

    // =========================================================================
    // Power actions
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn power_on(&self) -> Result<()> {
        self.reset(&self.config.system_reset_path(), "On").await
    }

    #[instrument(skip(self))]
    pub async fn power_off(&self) -> Result<()> {
        self.reset(&self.config.system_reset_path(), "ForceOff").await
    }

    /// Gracefully restart the management controller itself
    #[instrument(skip(self))]
    pub async fn restart_manager(&self) -> Result<()> {
        self.reset(&self.config.manager_reset_path(), "GracefulRestart")
            .await
    }

    async fn reset(&self, action: &ResourceReference, reset_type: &str) -> Result<()> {
        let body = ResourceResolver::encode(action, &ResetRequest { reset_type })?;
        self.resolver
            .fetch(Method::POST, action, Some(body))
            .await?;
        info!(%action, reset_type, "Reset requested");
        Ok(())
    }

    // =========================================================================
    // Health rollups
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn processor_health(&self) -> Result<Vec<HealthRecord>> {
        let processors: Vec<ProcessorResource> = self
            .walker()
            .walk(&self.config.processors_path(), &MemberFilter::All)
            .await?;
        Ok(Aggregator::new()
            .category("processors", &processors)
            .finish())
    }

    /// Power supplies, redundancy groups and voltage sensors
    #[instrument(skip(self))]
    pub async fn power_health(&self) -> Result<Vec<HealthRecord>> {
        let power: PowerResource = self.resolver.resolve(&self.config.power_path()).await?;
        Ok(power_rollup(&power))
    }

    /// Redundancy groups, fans and temperature sensors
    #[instrument(skip(self))]
    pub async fn thermal_health(&self) -> Result<Vec<HealthRecord>> {
        let thermal: ThermalResource = self.resolver.resolve(&self.config.thermal_path()).await?;
        Ok(thermal_rollup(&thermal))
    }

    /// Each storage controller followed by its drives
    #[instrument(skip(self))]
    pub async fn storage_health(&self) -> Result<Vec<StorageRecord>> {
        let walker = self.walker();
        let controllers: Vec<StorageResource> = walker
            .walk(&self.config.storage_path(), &MemberFilter::All)
            .await?;

        let mut tree = Vec::with_capacity(controllers.len());
        for controller in controllers {
            let drives: Vec<DriveResource> = walker.resolve_links(&controller.drives).await?;
            tree.push((controller, drives));
        }
        Ok(storage_rollup(&tree))
    }

    /// Health of installed firmware components
    #[instrument(skip(self))]
    pub async fn firmware_health(&self) -> Result<Vec<HealthRecord>> {
        let firmware = self.installed_firmware().await?;
        Ok(Aggregator::new().category("firmware", &firmware).finish())
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Physical drives of every storage controller
    #[instrument(skip(self))]
    pub async fn storage_drives(&self) -> Result<Vec<DriveResource>> {
        let walker = self.walker();
        let controllers: Vec<StorageResource> = walker
            .walk(&self.config.storage_path(), &MemberFilter::All)
            .await?;

        let mut drives = Vec::new();
        for controller in controllers.iter().filter(|c| !c.drives.is_empty()) {
            drives.extend(walker.resolve_links::<DriveResource>(&controller.drives).await?);
        }
        Ok(drives)
    }

    /// Installed firmware components
    #[instrument(skip(self))]
    pub async fn firmware_inventory(&self) -> Result<Vec<FirmwareRecord>> {
        let firmware = self.installed_firmware().await?;
        Ok(Aggregator::new().category("firmware", &firmware).finish())
    }

    async fn installed_firmware(&self) -> Result<Vec<FirmwareResource>> {
        self.walker()
            .walk(&self.config.firmware_inventory_path(), &MemberFilter::installed())
            .await
    }

    #[instrument(skip(self))]
    pub async fn network_interfaces(&self) -> Result<Vec<NetworkInterfaceRecord>> {
        let nics: Vec<EthernetInterfaceResource> = self
            .walker()
            .walk(&self.config.ethernet_interfaces_path(), &MemberFilter::All)
            .await?;
        Ok(Aggregator::new().category("interfaces", &nics).finish())
    }

    #[instrument(skip(self))]
    pub async fn user_accounts(&self) -> Result<Vec<AccountRecord>> {
        let accounts: Vec<AccountResource> = self
            .walker()
            .walk(&self.config.accounts_path(), &MemberFilter::All)
            .await?;
        Ok(Aggregator::new().category("accounts", &accounts).finish())
    }

    /// Every job in the controller's job queue
    #[instrument(skip(self))]
    pub async fn jobs(&self) -> Result<Vec<JobStatus>> {
        self.walker()
            .walk(&self.config.jobs_path(), &MemberFilter::All)
            .await
    }

    #[instrument(skip(self))]
    pub async fn boot_order(&self) -> Result<Vec<BootSource>> {
        let sources: BootSourcesResource = self
            .resolver
            .resolve(&self.config.boot_sources_path())
            .await?;
        Ok(sources.attributes.boot_seq)
    }

    // =========================================================================
    // Attributes and jobs
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn bios_attributes(&self) -> Result<AttributesResource> {
        self.resolver.resolve(&self.config.bios_path()).await
    }

    #[instrument(skip(self))]
    pub async fn manager_attributes(&self, target: AttributeTarget) -> Result<AttributesResource> {
        self.resolver
            .resolve(&self.config.attributes_path(target))
            .await
    }

    /// Stage BIOS changes; they apply after a job targets the settings resource
    #[instrument(skip(self, attributes))]
    pub async fn set_bios_settings(&self, attributes: &BTreeMap<String, Value>) -> Result<String> {
        let reference = self.config.bios_settings_path();
        self.message_action(Method::PATCH, &reference, &AttributesPatch { attributes })
            .await
    }

    #[instrument(skip(self, attributes))]
    pub async fn set_attributes(
        &self,
        target: AttributeTarget,
        attributes: &BTreeMap<String, Value>,
    ) -> Result<String> {
        let reference = self.config.attributes_path(target);
        self.message_action(Method::PATCH, &reference, &AttributesPatch { attributes })
            .await
    }

    /// Queue a configuration job for a settings resource
    ///
    /// Use [`ClientConfig::bios_settings_path`] to apply staged BIOS changes.
    #[instrument(skip(self))]
    pub async fn create_job(&self, target_settings_uri: &ResourceReference) -> Result<String> {
        let reference = self.config.jobs_path();
        self.message_action(
            Method::POST,
            &reference,
            &JobRequest {
                target_settings_uri,
            },
        )
        .await
    }

    /// Delete every job in the queue; returns how many were deleted
    #[instrument(skip(self))]
    pub async fn clear_jobs(&self) -> Result<usize> {
        let envelope = self.walker().envelope(&self.config.jobs_path()).await?;
        for job in envelope.references() {
            self.resolver.fetch(Method::DELETE, job, None).await?;
            debug!(%job, "Deleted job");
        }
        info!(count = envelope.len(), "Cleared job queue");
        Ok(envelope.len())
    }

    /// Send a mutation and return the first extended-info message
    async fn message_action<B: Serialize>(
        &self,
        method: Method,
        reference: &ResourceReference,
        body: &B,
    ) -> Result<String> {
        let payload = ResourceResolver::encode(reference, body)?;
        let response = self
            .resolver
            .fetch(method.clone(), reference, Some(payload))
            .await?;
        info!(%method, %reference, status = response.status, "Mutation accepted");

        if response.body.is_empty() {
            return Err(RedfishError::MissingMessage(reference.to_string()));
        }
        let message: MessageResponse = self.resolver.decode(reference, &response.body)?;
        message
            .first_message()
            .map(str::to_string)
            .ok_or_else(|| RedfishError::MissingMessage(reference.to_string()))
    }

    // =========================================================================
    // Event logs
    // =========================================================================

    /// System event log, decoded with the layout of firmware `version`
    #[instrument(skip(self))]
    pub async fn system_event_logs(&self, version: &str) -> Result<Vec<EventLogEntry>> {
        let layout = select_schema(version, &event_log_rules())?;
        let reference = self.config.event_log_path();

        let entries = match layout {
            LogLayout::V1 => self.resolver.resolve::<EventLogV1>(&reference).await?.into(),
            LogLayout::V2 => self.resolver.resolve::<EventLogV2>(&reference).await?.into(),
        };
        Ok(entries)
    }

    /// System event log, reading the controller firmware version first
    #[instrument(skip(self))]
    pub async fn system_event_logs_auto(&self) -> Result<Vec<EventLogEntry>> {
        let version = self.manager_firmware_version().await?;
        self.system_event_logs(&version).await
    }

    // =========================================================================
    // Configuration export
    // =========================================================================

    /// Export the configuration of `target` and wait for the task
    #[instrument(skip(self))]
    pub async fn export_system_configuration(
        &self,
        target: ExportTarget,
    ) -> Result<TaskOutcome<ExportConfigResponse>> {
        self.export_system_configuration_until(target, std::future::pending())
            .await
    }

    /// Export the configuration of `target`, giving up when `cancel` resolves
    #[instrument(skip(self, cancel))]
    pub async fn export_system_configuration_until<F>(
        &self,
        target: ExportTarget,
        cancel: F,
    ) -> Result<TaskOutcome<ExportConfigResponse>>
    where
        F: Future<Output = ()>,
    {
        self.poller()
            .run_until(
                &self.config.export_configuration_path(),
                &ExportRequest::json(target),
                cancel,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseMode;
    use crate::testing::{mock_client, mock_client_with, MockGateway, MockResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SYSTEM: &str = "/redfish/v1/Systems/System.Embedded.1";
    const MANAGER: &str = "/redfish/v1/Managers/iDRAC.Embedded.1";

    fn system_body() -> MockResponse {
        MockResponse::value(&json!({
            "Id": "System.Embedded.1",
            "Model": "PowerEdge R740xd",
            "SerialNumber": "CN7475179C0123",
            "PowerState": "On",
            "Status": {"Health": "OK", "HealthRollup": "OK", "State": "Enabled"},
            "MemorySummary": {"TotalSystemMemoryGiB": 383.4375},
            "ProcessorSummary": {"Count": 2, "Model": "Intel(R) Xeon(R) Gold 6130 CPU @ 2.10GHz"}
        }))
    }

    #[tokio::test]
    async fn test_system_info() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get(SYSTEM, system_body());
        let client = mock_client(mock.clone()).unwrap();

        let info = client.system_info().await.unwrap();
        assert_eq!(info.model, "PowerEdge R740xd");
        assert_eq!(info.processors, 2);
        assert_eq!(info.memory_gib, 383.4375);
        assert_eq!(client.power_state().await.unwrap(), "On");
        assert_eq!(client.check_login().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_processor_health_names_by_id() {
        let mock = Arc::new(MockGateway::new());
        let processors = format!("{}/Processors", SYSTEM);
        let cpu1 = format!("{}/CPU.Socket.1", processors);
        let cpu2 = format!("{}/CPU.Socket.2", processors);
        mock.on_collection(&processors, &[&cpu1, &cpu2])
            .on_get(
                &cpu1,
                MockResponse::json(
                    r#"{"Id": "CPU.Socket.1", "Name": "CPU 1", "Status": {"Health": "OK", "State": "Enabled"}}"#,
                ),
            )
            .on_get(
                &cpu2,
                MockResponse::json(
                    r#"{"Id": "CPU.Socket.2", "Name": "CPU 2", "Status": {"Health": "Critical", "State": "Enabled"}}"#,
                ),
            );
        let client = mock_client(mock).unwrap();

        let health = client.processor_health().await.unwrap();
        assert_eq!(
            health,
            vec![
                HealthRecord {
                    name: "CPU.Socket.1".to_string(),
                    health: "OK".to_string(),
                    state: "Enabled".to_string(),
                },
                HealthRecord {
                    name: "CPU.Socket.2".to_string(),
                    health: "Critical".to_string(),
                    state: "Enabled".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_network_interfaces_map_vlan() {
        let mock = Arc::new(MockGateway::new());
        let nics = format!("{}/EthernetInterfaces", SYSTEM);
        let tagged = format!("{}/NIC.Integrated.1-1-1", nics);
        let plain = format!("{}/NIC.Integrated.1-2-1", nics);
        mock.on_collection(&nics, &[&tagged, &plain])
            .on_get(
                &tagged,
                MockResponse::json(
                    r#"{"Id": "NIC.Integrated.1-1-1", "Description": "Integrated NIC 1 Port 1",
                        "MACAddress": "24:6E:96:AA:BB:01", "Status": {"Health": "OK", "State": "Enabled"},
                        "VLAN": {"VLANEnable": true, "VLANId": 42}}"#,
                ),
            )
            .on_get(
                &plain,
                MockResponse::json(
                    r#"{"Id": "NIC.Integrated.1-2-1", "MACAddress": "24:6E:96:AA:BB:02"}"#,
                ),
            );
        let client = mock_client(mock).unwrap();

        let interfaces = client.network_interfaces().await.unwrap();
        assert_eq!(interfaces.len(), 2);
        assert_eq!(
            interfaces[0],
            NetworkInterfaceRecord {
                name: "NIC.Integrated.1-1-1".to_string(),
                description: "Integrated NIC 1 Port 1".to_string(),
                mac_address: "24:6E:96:AA:BB:01".to_string(),
                health: "OK".to_string(),
                state: "Enabled".to_string(),
                vlan_enabled: true,
                vlan_id: Some(42),
            }
        );
        assert_eq!(interfaces[1].name, "NIC.Integrated.1-2-1");
        assert!(!interfaces[1].vlan_enabled);
        assert_eq!(interfaces[1].vlan_id, None);
        assert_eq!(interfaces[1].health, "");
    }

    #[tokio::test]
    async fn test_jobs_walk_queue_in_order() {
        let mock = Arc::new(MockGateway::new());
        let jobs = format!("{}/Jobs", MANAGER);
        let a = format!("{}/JID_100", jobs);
        let b = format!("{}/JID_200", jobs);
        mock.on_collection(&jobs, &[&a, &b])
            .on_get(
                &a,
                MockResponse::json(
                    r#"{"Id": "JID_100", "Name": "Configure: BIOS.Setup.1-1", "JobState": "Scheduled", "PercentComplete": 0}"#,
                ),
            )
            .on_get(
                &b,
                MockResponse::json(
                    r#"{"Id": "JID_200", "Name": "Export: System Configuration", "JobState": "Completed", "PercentComplete": 100, "Message": "Successfully exported"}"#,
                ),
            );
        let client = mock_client(mock.clone()).unwrap();

        let queue = client.jobs().await.unwrap();
        let ids: Vec<&str> = queue.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["JID_100", "JID_200"]);
        assert_eq!(queue[0].job_state, "Scheduled");
        assert_eq!(queue[1].percent_complete, Some(100));
        assert_eq!(queue[1].message, "Successfully exported");
        assert_eq!(mock.count(&Method::GET, &a), 1);
    }

    #[tokio::test]
    async fn test_bios_and_manager_attributes() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get(
            &format!("{}/Bios", SYSTEM),
            MockResponse::json(
                r#"{"Id": "BIOS", "Attributes": {"BootMode": "Uefi", "ProcCores": 8}}"#,
            ),
        )
        .on_get(
            &format!("{}/Attributes", MANAGER),
            MockResponse::json(
                r#"{"Id": "iDRACAttributes", "Attributes": {"IPMILan.1.Enable": "Enabled"}}"#,
            ),
        )
        .on_get(
            "/redfish/v1/Managers/System.Embedded.1/Attributes",
            MockResponse::json(r#"{"Id": "SystemAttributes", "Attributes": {"ServerPwr.1.PSRedPolicy": "A/B Grid Redundant"}}"#),
        );
        let client = mock_client(mock).unwrap();

        let bios = client.bios_attributes().await.unwrap();
        assert_eq!(bios.attributes["BootMode"], json!("Uefi"));
        assert_eq!(bios.attributes["ProcCores"], json!(8));

        let idrac = client
            .manager_attributes(AttributeTarget::Idrac)
            .await
            .unwrap();
        assert_eq!(idrac.id, "iDRACAttributes");
        assert_eq!(idrac.attributes["IPMILan.1.Enable"], json!("Enabled"));

        let system = client
            .manager_attributes(AttributeTarget::System)
            .await
            .unwrap();
        assert_eq!(system.attributes.len(), 1);
    }

    #[tokio::test]
    async fn test_power_actions_send_reset_type() {
        let mock = Arc::new(MockGateway::new());
        let reset = format!("{}/Actions/ComputerSystem.Reset", SYSTEM);
        mock.on_post(&reset, MockResponse::status(204))
            .on_post(
                &format!("{}/Actions/Manager.Reset", MANAGER),
                MockResponse::status(204),
            );
        let client = mock_client(mock.clone()).unwrap();

        client.power_on().await.unwrap();
        client.power_off().await.unwrap();
        client.restart_manager().await.unwrap();

        let bodies: Vec<Value> = mock
            .requests()
            .into_iter()
            .filter_map(|r| r.body)
            .collect();
        assert_eq!(
            bodies,
            vec![
                json!({"ResetType": "On"}),
                json!({"ResetType": "ForceOff"}),
                json!({"ResetType": "GracefulRestart"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_set_attributes_returns_first_message() {
        let mock = Arc::new(MockGateway::new());
        mock.on_patch(
            "/redfish/v1/Managers/LifecycleController.Embedded.1/Attributes",
            MockResponse::json(
                r#"{"@Message.ExtendedInfo": [
                    {"Message": "The request completed successfully.", "MessageId": "Base.1.2.Success"},
                    {"Message": "ignored"}
                ]}"#,
            ),
        );
        let client = mock_client(mock.clone()).unwrap();

        let mut attrs = BTreeMap::new();
        attrs.insert("LCAttributes.1.AutoUpdate".to_string(), json!("Enabled"));
        let message = client
            .set_attributes(AttributeTarget::LifecycleController, &attrs)
            .await
            .unwrap();

        assert_eq!(message, "The request completed successfully.");
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({"Attributes": {"LCAttributes.1.AutoUpdate": "Enabled"}}))
        );
    }

    #[tokio::test]
    async fn test_missing_message_is_an_error() {
        let mock = Arc::new(MockGateway::new());
        mock.on_patch(
            &format!("{}/Bios/Settings", SYSTEM),
            MockResponse::json(r#"{"@Message.ExtendedInfo": []}"#),
        );
        let client = mock_client(mock).unwrap();

        let err = client.set_bios_settings(&BTreeMap::new()).await.unwrap_err();
        assert!(matches!(err, RedfishError::MissingMessage(_)));
    }

    #[tokio::test]
    async fn test_create_job_payload() {
        let mock = Arc::new(MockGateway::new());
        mock.on_post(
            &format!("{}/Jobs", MANAGER),
            MockResponse::json(r#"{"@Message.ExtendedInfo": [{"Message": "Job created"}]}"#),
        );
        let client = mock_client(mock.clone()).unwrap();

        let settings = client.config().bios_settings_path();
        assert_eq!(client.create_job(&settings).await.unwrap(), "Job created");
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({"TargetSettingsURI": "/redfish/v1/Systems/System.Embedded.1/Bios/Settings"}))
        );
    }

    #[tokio::test]
    async fn test_clear_jobs_deletes_every_member() {
        let mock = Arc::new(MockGateway::new());
        let jobs = format!("{}/Jobs", MANAGER);
        let a = format!("{}/JID_1", jobs);
        let b = format!("{}/JID_2", jobs);
        mock.on_collection(&jobs, &[&a, &b])
            .on_delete(&a, MockResponse::status(200))
            .on_delete(&b, MockResponse::status(200));
        let client = mock_client(mock.clone()).unwrap();

        assert_eq!(client.clear_jobs().await.unwrap(), 2);
        assert_eq!(mock.count(&Method::DELETE, &a), 1);
        assert_eq!(mock.count(&Method::DELETE, &b), 1);
    }

    #[tokio::test]
    async fn test_event_logs_pick_layout_by_version() {
        let mock = Arc::new(MockGateway::new());
        let sel = format!("{}/Logs/Sel", MANAGER);
        mock.on_get(
            &sel,
            MockResponse::json(
                r#"{"Members": [{"EntryCode": [{"Member": "Assert"}], "SensorType": [{"Member": "Fan"}], "Severity": "Warning"}]}"#,
            ),
        );
        let client = mock_client(mock).unwrap();

        let entries = client.system_event_logs("2.70.70.70").await.unwrap();
        assert_eq!(entries[0].entry_code, "Assert");
        assert_eq!(entries[0].sensor_type, "Fan");

        // Same body, newer firmware: scalar layout does not fit
        let err = client.system_event_logs("4.40.00.00").await.unwrap_err();
        assert!(matches!(err, RedfishError::Parse { .. }));

        let err = client.system_event_logs("latest").await.unwrap_err();
        assert!(matches!(err, RedfishError::VersionParse(_)));
    }

    #[tokio::test]
    async fn test_event_logs_auto_reads_manager_version() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get(MANAGER, MockResponse::json(r#"{"FirmwareVersion": "4.40.00.00"}"#))
            .on_get(
                &format!("{}/Logs/Sel", MANAGER),
                MockResponse::json(
                    r#"{"Members": [{"EntryCode": "Deassert", "SensorType": "Temperature", "Message": "ok"}]}"#,
                ),
            );
        let client = mock_client(mock).unwrap();

        let entries = client.system_event_logs_auto().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_code, "Deassert");
    }

    #[tokio::test]
    async fn test_permissive_event_log_mismatch_yields_empty() {
        let mock = Arc::new(MockGateway::new());
        mock.on_get(
            &format!("{}/Logs/Sel", MANAGER),
            MockResponse::json(r#"{"Members": [{"EntryCode": [{"Member": "Assert"}]}]}"#),
        );
        let client = mock_client_with(mock, |b| b.parse_mode(ParseMode::Permissive)).unwrap();

        let entries = client.system_event_logs("4.40.00.00").await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_export_configuration_polls_task() {
        let mock = Arc::new(MockGateway::new());
        let task = "/redfish/v1/TaskService/Tasks/JID_467762674724";
        mock.on_post(
            &format!("{}/Actions/Oem/EID_674_Manager.ExportSystemConfiguration", MANAGER),
            MockResponse::status(202).with_header("Location", task),
        )
        .on_get(task, MockResponse::json(r#"{"TaskState": "Running"}"#))
        .on_get(
            task,
            MockResponse::json(
                r#"{"SystemConfiguration": {"Model": "PowerEdge R740xd", "ServiceTag": "ABC1234", "Components": []}}"#,
            ),
        );
        let client = mock_client(mock.clone()).unwrap();

        let outcome = client
            .export_system_configuration(ExportTarget::Bios)
            .await
            .unwrap();

        assert_eq!(outcome.result.system_configuration.service_tag, "ABC1234");
        assert!(!outcome.is_failure());
        assert_eq!(mock.count(&Method::GET, task), 2);
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({"ExportFormat": "JSON", "ShareParameters": {"Target": "BIOS"}}))
        );
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<RedfishClient>();
    }
}
