//! Client configuration with YAML support
//!
//! ```yaml
//! connection:
//!   base_url: "https://idrac.example.com"
//!   username: "root"
//!   password: "calvin"
//!   insecure: true
//!
//! resources:
//!   system_id: "System.Embedded.1"
//!   manager_id: "iDRAC.Embedded.1"
//!
//! timeouts:
//!   task_poll_ms: 60000
//!   task_timeout_ms: 1800000
//!
//! walk:
//!   concurrency: 4
//!
//! parse_mode: strict
//! ```

use std::path::Path;
use std::time::Duration;

use redfish_core::ResourceReference;
use serde::{Deserialize, Serialize};

use crate::task::PollPolicy;

/// Redfish client configuration
///
/// Immutable once handed to [`crate::RedfishClient`]; every component reads
/// it, none mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Connection settings
    pub connection: ConnectionConfig,

    /// Resource identifiers used to build paths
    #[serde(default)]
    pub resources: ResourceIds,

    /// Timeout and polling settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Collection walking settings
    #[serde(default)]
    pub walk: WalkConfig,

    /// How to treat response bodies that fail to deserialize
    #[serde(default)]
    pub parse_mode: ParseMode,
}

/// Connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Scheme and host of the management service (e.g. `https://10.0.0.5`)
    pub base_url: String,

    /// Basic auth user name
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default)]
    pub password: Option<String>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
}

/// Identifiers of the system, chassis and manager resources
///
/// Defaults match Dell iDRAC naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceIds {
    #[serde(default = "default_service_root")]
    pub service_root: String,

    #[serde(default = "default_system_id")]
    pub system_id: String,

    #[serde(default = "default_system_id")]
    pub chassis_id: String,

    #[serde(default = "default_manager_id")]
    pub manager_id: String,

    #[serde(default = "default_lifecycle_id")]
    pub lifecycle_id: String,
}

impl Default for ResourceIds {
    fn default() -> Self {
        Self {
            service_root: default_service_root(),
            system_id: default_system_id(),
            chassis_id: default_system_id(),
            manager_id: default_manager_id(),
            lifecycle_id: default_lifecycle_id(),
        }
    }
}

fn default_service_root() -> String {
    "/redfish/v1".to_string()
}

fn default_system_id() -> String {
    "System.Embedded.1".to_string()
}

fn default_manager_id() -> String {
    "iDRAC.Embedded.1".to_string()
}

fn default_lifecycle_id() -> String {
    "LifecycleController.Embedded.1".to_string()
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// General request timeout in milliseconds (default: 30s)
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,

    /// Connect timeout in milliseconds (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Interval between task status polls in milliseconds (default: 1 minute)
    #[serde(default = "default_task_poll")]
    pub task_poll_ms: u64,

    /// Give up on a task after this long (default: 30 minutes, `null` = never)
    #[serde(default = "default_task_timeout")]
    pub task_timeout_ms: Option<u64>,

    /// Give up on a task after this many polls (default: unlimited)
    #[serde(default)]
    pub task_max_polls: Option<u32>,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_timeout(),
            connect_ms: default_connect_timeout(),
            task_poll_ms: default_task_poll(),
            task_timeout_ms: default_task_timeout(),
            task_max_polls: None,
        }
    }
}

fn default_request_timeout() -> u64 {
    30_000 // 30 seconds
}

fn default_connect_timeout() -> u64 {
    10_000 // 10 seconds
}

fn default_task_poll() -> u64 {
    60_000 // 1 minute
}

fn default_task_timeout() -> Option<u64> {
    Some(1_800_000) // 30 minutes
}

/// Collection walking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Members resolved concurrently (1 = strictly sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

/// Handling of bodies that fail to deserialize
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Return a parse error
    #[default]
    Strict,
    /// Log a warning and substitute the zero-valued record
    Permissive,
}

/// Manager attribute registries that can be read and patched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeTarget {
    Idrac,
    #[serde(rename = "lc")]
    LifecycleController,
    System,
}

impl std::str::FromStr for AttributeTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idrac" => Ok(Self::Idrac),
            "lc" | "lifecycle" | "lifecyclecontroller" => Ok(Self::LifecycleController),
            "system" => Ok(Self::System),
            _ => Err(format!(
                "Unknown attribute target '{}'. Valid: idrac, lc, system",
                s
            )),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.connection.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url: {}", e)))?;
        if self.walk.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "walk.concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeouts.task_max_polls == Some(0) {
            return Err(ConfigError::Invalid(
                "timeouts.task_max_polls must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Task polling policy derived from the timeout settings
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.timeouts.task_poll_ms),
            timeout: self.timeouts.task_timeout_ms.map(Duration::from_millis),
            max_polls: self.timeouts.task_max_polls,
        }
    }

    // =========================================================================
    // Resource paths
    // =========================================================================

    fn root(&self) -> ResourceReference {
        ResourceReference::new(self.resources.service_root.clone())
    }

    pub fn system_path(&self) -> ResourceReference {
        self.root()
            .join(&format!("Systems/{}", self.resources.system_id))
    }

    pub fn system_reset_path(&self) -> ResourceReference {
        self.system_path().join("Actions/ComputerSystem.Reset")
    }

    pub fn processors_path(&self) -> ResourceReference {
        self.system_path().join("Processors")
    }

    pub fn storage_path(&self) -> ResourceReference {
        self.system_path().join("Storage")
    }

    pub fn ethernet_interfaces_path(&self) -> ResourceReference {
        self.system_path().join("EthernetInterfaces")
    }

    pub fn bios_path(&self) -> ResourceReference {
        self.system_path().join("Bios")
    }

    pub fn bios_settings_path(&self) -> ResourceReference {
        self.bios_path().join("Settings")
    }

    pub fn boot_sources_path(&self) -> ResourceReference {
        self.system_path().join("BootSources")
    }

    fn chassis_path(&self) -> ResourceReference {
        self.root()
            .join(&format!("Chassis/{}", self.resources.chassis_id))
    }

    pub fn power_path(&self) -> ResourceReference {
        self.chassis_path().join("Power")
    }

    pub fn thermal_path(&self) -> ResourceReference {
        self.chassis_path().join("Thermal")
    }

    pub fn firmware_inventory_path(&self) -> ResourceReference {
        self.root().join("UpdateService/FirmwareInventory")
    }

    pub fn manager_path(&self) -> ResourceReference {
        self.root()
            .join(&format!("Managers/{}", self.resources.manager_id))
    }

    pub fn manager_reset_path(&self) -> ResourceReference {
        self.manager_path().join("Actions/Manager.Reset")
    }

    pub fn accounts_path(&self) -> ResourceReference {
        self.manager_path().join("Accounts")
    }

    pub fn jobs_path(&self) -> ResourceReference {
        self.manager_path().join("Jobs")
    }

    pub fn event_log_path(&self) -> ResourceReference {
        self.manager_path().join("Logs/Sel")
    }

    pub fn export_configuration_path(&self) -> ResourceReference {
        self.manager_path()
            .join("Actions/Oem/EID_674_Manager.ExportSystemConfiguration")
    }

    /// Attribute registry of a manager
    ///
    /// System attributes live under `Managers/{system_id}`, not `Systems/`.
    pub fn attributes_path(&self, target: AttributeTarget) -> ResourceReference {
        let manager = match target {
            AttributeTarget::Idrac => &self.resources.manager_id,
            AttributeTarget::LifecycleController => &self.resources.lifecycle_id,
            AttributeTarget::System => &self.resources.system_id,
        };
        self.root()
            .join(&format!("Managers/{}/Attributes", manager))
    }
}

/// Builder for ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                connection: ConnectionConfig {
                    base_url: base_url.into(),
                    username: None,
                    password: None,
                    insecure: false,
                },
                resources: ResourceIds::default(),
                timeouts: TimeoutsConfig::default(),
                walk: WalkConfig::default(),
                parse_mode: ParseMode::default(),
            },
        }
    }

    /// Set basic auth credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.connection.username = Some(username.into());
        self.config.connection.password = Some(password.into());
        self
    }

    /// Skip TLS certificate verification
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.config.connection.insecure = insecure;
        self
    }

    pub fn system_id(mut self, id: impl Into<String>) -> Self {
        self.config.resources.system_id = id.into();
        self
    }

    pub fn chassis_id(mut self, id: impl Into<String>) -> Self {
        self.config.resources.chassis_id = id.into();
        self
    }

    pub fn manager_id(mut self, id: impl Into<String>) -> Self {
        self.config.resources.manager_id = id.into();
        self
    }

    /// Set request timeout in milliseconds
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.request_ms = ms;
        self
    }

    /// Set task poll interval in milliseconds
    pub fn task_poll_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.task_poll_ms = ms;
        self
    }

    /// Set task timeout in milliseconds (`None` waits forever)
    pub fn task_timeout_ms(mut self, ms: Option<u64>) -> Self {
        self.config.timeouts.task_timeout_ms = ms;
        self
    }

    /// Cap the number of task status polls
    pub fn task_max_polls(mut self, polls: u32) -> Self {
        self.config.timeouts.task_max_polls = Some(polls);
        self
    }

    /// Resolve up to `n` collection members at once
    pub fn walk_concurrency(mut self, n: usize) -> Self {
        self.config.walk.concurrency = n;
        self
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.config.parse_mode = mode;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
connection:
  base_url: "https://10.0.0.5"
  username: "root"
  password: "calvin"
  insecure: true

timeouts:
  task_poll_ms: 5000
  task_timeout_ms: null

walk:
  concurrency: 4

parse_mode: permissive
"#;

        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.base_url, "https://10.0.0.5");
        assert_eq!(config.connection.username.as_deref(), Some("root"));
        assert!(config.connection.insecure);
        assert_eq!(config.timeouts.task_poll_ms, 5000);
        assert_eq!(config.timeouts.task_timeout_ms, None);
        assert_eq!(config.walk.concurrency, 4);
        assert_eq!(config.parse_mode, ParseMode::Permissive);
        // Unspecified sections fall back to iDRAC defaults
        assert_eq!(config.resources.manager_id, "iDRAC.Embedded.1");
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redfish.yaml");
        std::fs::write(&path, "connection:\n  base_url: \"https://bmc\"\n").unwrap();

        let config = ClientConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.timeouts.task_poll_ms, 60_000);
        assert_eq!(config.parse_mode, ParseMode::Strict);
    }

    #[test]
    fn test_validation() {
        let yaml = "connection:\n  base_url: \"https://bmc\"\nwalk:\n  concurrency: 0\n";
        assert!(matches!(
            ClientConfig::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));

        let yaml = "connection:\n  base_url: \"not a url\"\n";
        assert!(matches!(
            ClientConfig::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_builder_and_poll_policy() {
        let config = ClientConfig::builder("https://bmc")
            .credentials("root", "calvin")
            .task_poll_ms(10)
            .task_timeout_ms(Some(100))
            .task_max_polls(5)
            .build();

        let policy = config.poll_policy();
        assert_eq!(policy.interval, Duration::from_millis(10));
        assert_eq!(policy.timeout, Some(Duration::from_millis(100)));
        assert_eq!(policy.max_polls, Some(5));
    }

    #[test]
    fn test_path_resolution() {
        let config = ClientConfig::builder("https://bmc").build();

        assert_eq!(
            config.system_reset_path().as_str(),
            "/redfish/v1/Systems/System.Embedded.1/Actions/ComputerSystem.Reset"
        );
        assert_eq!(
            config.power_path().as_str(),
            "/redfish/v1/Chassis/System.Embedded.1/Power"
        );
        assert_eq!(
            config.event_log_path().as_str(),
            "/redfish/v1/Managers/iDRAC.Embedded.1/Logs/Sel"
        );
        assert_eq!(
            config.attributes_path(AttributeTarget::LifecycleController).as_str(),
            "/redfish/v1/Managers/LifecycleController.Embedded.1/Attributes"
        );
        assert_eq!(
            config.attributes_path(AttributeTarget::System).as_str(),
            "/redfish/v1/Managers/System.Embedded.1/Attributes"
        );
        assert_eq!(
            config.export_configuration_path().as_str(),
            "/redfish/v1/Managers/iDRAC.Embedded.1/Actions/Oem/EID_674_Manager.ExportSystemConfiguration"
        );

        let custom = ClientConfig::builder("https://bmc")
            .system_id("1")
            .manager_id("1")
            .build();
        assert_eq!(custom.bios_settings_path().as_str(), "/redfish/v1/Systems/1/Bios/Settings");
        assert_eq!(custom.jobs_path().as_str(), "/redfish/v1/Managers/1/Jobs");
    }

    #[rstest]
    #[case("idrac", AttributeTarget::Idrac)]
    #[case("iDRAC", AttributeTarget::Idrac)]
    #[case("lc", AttributeTarget::LifecycleController)]
    #[case("LifecycleController", AttributeTarget::LifecycleController)]
    #[case("system", AttributeTarget::System)]
    fn test_attribute_target_from_str(#[case] input: &str, #[case] expected: AttributeTarget) {
        assert_eq!(input.parse::<AttributeTarget>().unwrap(), expected);
    }

    #[test]
    fn test_attribute_target_rejects_bios() {
        assert!("bios".parse::<AttributeTarget>().is_err());
    }

    #[test]
    fn test_to_yaml() {
        let config = ClientConfig::builder("https://bmc").insecure(true).build();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("base_url"));
        assert!(yaml.contains("insecure: true"));
    }
}
