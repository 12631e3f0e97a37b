//! Inventory records returned by the client
//!
//! Each record is produced from exactly one resource fetch.

use serde::{Deserialize, Serialize};

/// Installed or available firmware component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareRecord {
    pub name: String,
    pub id: String,
    pub version: String,
    pub updateable: bool,
}

/// Storage controller or physical drive
///
/// Controllers report a capacity of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub name: String,
    pub health: String,
    pub state: String,
    pub capacity_bytes: u64,
}

/// Ethernet interface with its MAC address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterfaceRecord {
    pub name: String,
    pub description: String,
    pub mac_address: String,
    pub health: String,
    pub state: String,
    pub vlan_enabled: bool,
    pub vlan_id: Option<u32>,
}

/// Local user account on the management controller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    pub enabled: bool,
    pub locked: bool,
    pub role: String,
    pub username: String,
}

/// Condensed view of the computer system resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub health: String,
    pub memory_gib: f64,
    pub model: String,
    pub power_state: String,
    pub processors: u32,
    pub processor_family: String,
    pub serial_number: String,
}

/// One entry of the boot sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BootSource {
    pub enabled: bool,
    pub index: u32,
    pub name: String,
}
