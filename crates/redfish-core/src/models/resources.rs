//! Wire shapes of the resources the client reads
//!
//! Only the fields surfaced by client operations are typed. Every struct
//! defaults missing fields so that firmware omitting optional properties
//! still deserializes; malformed JSON or mismatched types remain errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::health::{HealthRecord, Status, Summarize};
use super::inventory::{
    AccountRecord, BootSource, FirmwareRecord, NetworkInterfaceRecord, StorageRecord,
    SystemSummary,
};
use super::odata::Link;

// =============================================================================
// Systems
// =============================================================================

/// `Systems/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SystemResource {
    pub id: String,
    pub model: String,
    pub serial_number: String,
    pub power_state: String,
    pub status: Status,
    pub memory_summary: MemorySummary,
    pub processor_summary: ProcessorSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySummary {
    #[serde(rename = "TotalSystemMemoryGiB")]
    pub total_system_memory_gib: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProcessorSummary {
    pub count: u32,
    pub model: String,
}

impl Summarize<SystemSummary> for SystemResource {
    fn summarize(&self) -> SystemSummary {
        SystemSummary {
            health: self.status.health_str().to_string(),
            memory_gib: self.memory_summary.total_system_memory_gib,
            model: self.model.clone(),
            power_state: self.power_state.clone(),
            processors: self.processor_summary.count,
            processor_family: self.processor_summary.model.clone(),
            serial_number: self.serial_number.clone(),
        }
    }
}

/// `Systems/{id}/Processors/{cpu}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProcessorResource {
    pub id: String,
    pub name: String,
    pub model: String,
    pub status: Status,
}

impl Summarize<HealthRecord> for ProcessorResource {
    fn summarize(&self) -> HealthRecord {
        HealthRecord::new(&self.id, &self.status)
    }
}

/// `Systems/{id}/EthernetInterfaces/{nic}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EthernetInterfaceResource {
    pub id: String,
    pub description: String,
    #[serde(rename = "MACAddress")]
    pub mac_address: String,
    pub status: Status,
    #[serde(rename = "VLAN")]
    pub vlan: Option<Vlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vlan {
    #[serde(rename = "VLANEnable")]
    pub enabled: bool,
    #[serde(rename = "VLANId")]
    pub id: Option<u32>,
}

impl Summarize<NetworkInterfaceRecord> for EthernetInterfaceResource {
    fn summarize(&self) -> NetworkInterfaceRecord {
        let vlan = self.vlan.clone().unwrap_or_default();
        NetworkInterfaceRecord {
            name: self.id.clone(),
            description: self.description.clone(),
            mac_address: self.mac_address.clone(),
            health: self.status.health_str().to_string(),
            state: self.status.state_str().to_string(),
            vlan_enabled: vlan.enabled,
            vlan_id: vlan.id,
        }
    }
}

/// `Systems/{id}/Bios` and the `*/Attributes` manager resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttributesResource {
    pub id: String,
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// `Systems/{id}/BootSources`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BootSourcesResource {
    pub attributes: BootSequence,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootSequence {
    #[serde(rename = "BootSeq", alias = "UefiBootSeq")]
    pub boot_seq: Vec<BootSource>,
}

// =============================================================================
// Chassis
// =============================================================================

/// `Chassis/{id}/Power`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PowerResource {
    pub power_supplies: Vec<PowerSupply>,
    pub redundancy: Vec<Redundancy>,
    pub voltages: Vec<Sensor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PowerSupply {
    #[serde(rename = "MemberId")]
    pub member_id: String,
    pub name: String,
    pub status: Status,
}

impl Summarize<HealthRecord> for PowerSupply {
    fn summarize(&self) -> HealthRecord {
        HealthRecord::new(&self.member_id, &self.status)
    }
}

/// Redundancy group shared by the power and thermal resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Redundancy {
    #[serde(rename = "MemberId")]
    pub member_id: String,
    pub name: String,
    pub mode: Option<String>,
    pub status: Status,
}

impl Summarize<HealthRecord> for Redundancy {
    fn summarize(&self) -> HealthRecord {
        HealthRecord::new(&self.name, &self.status)
    }
}

/// Voltage, fan or temperature sensor reading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Sensor {
    #[serde(rename = "MemberId")]
    pub member_id: String,
    #[serde(alias = "FanName")]
    pub name: String,
    pub status: Status,
}

impl Summarize<HealthRecord> for Sensor {
    fn summarize(&self) -> HealthRecord {
        HealthRecord::new(&self.name, &self.status)
    }
}

/// `Chassis/{id}/Thermal`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ThermalResource {
    pub redundancy: Vec<Redundancy>,
    pub fans: Vec<Sensor>,
    pub temperatures: Vec<Sensor>,
}

// =============================================================================
// Storage
// =============================================================================

/// `Systems/{id}/Storage/{controller}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageResource {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub drives: Vec<Link>,
}

impl Summarize<StorageRecord> for StorageResource {
    fn summarize(&self) -> StorageRecord {
        StorageRecord {
            name: self.id.clone(),
            health: self.status.health_str().to_string(),
            state: self.status.state_str().to_string(),
            capacity_bytes: 0,
        }
    }
}

/// `Systems/{id}/Storage/Drives/{drive}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DriveResource {
    pub id: String,
    pub name: String,
    pub model: String,
    pub serial_number: String,
    pub media_type: String,
    pub protocol: String,
    pub capacity_bytes: u64,
    pub status: Status,
}

impl Summarize<StorageRecord> for DriveResource {
    fn summarize(&self) -> StorageRecord {
        StorageRecord {
            name: self.name.clone(),
            health: self.status.health_str().to_string(),
            state: self.status.state_str().to_string(),
            capacity_bytes: self.capacity_bytes,
        }
    }
}

// =============================================================================
// Update service
// =============================================================================

/// `UpdateService/FirmwareInventory/{entry}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FirmwareResource {
    pub id: String,
    pub name: String,
    pub version: String,
    pub updateable: bool,
    pub status: Status,
}

impl Summarize<FirmwareRecord> for FirmwareResource {
    fn summarize(&self) -> FirmwareRecord {
        FirmwareRecord {
            name: self.name.clone(),
            id: self.id.clone(),
            version: self.version.clone(),
            updateable: self.updateable,
        }
    }
}

impl Summarize<HealthRecord> for FirmwareResource {
    fn summarize(&self) -> HealthRecord {
        HealthRecord::new(&self.name, &self.status)
    }
}

// =============================================================================
// Managers
// =============================================================================

/// `Managers/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagerResource {
    pub id: String,
    pub model: String,
    pub firmware_version: String,
    pub status: Status,
}

/// `Managers/{id}/Accounts/{n}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountResource {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub locked: bool,
    #[serde(rename = "RoleId")]
    pub role_id: String,
    pub user_name: String,
}

impl Summarize<AccountRecord> for AccountResource {
    fn summarize(&self) -> AccountRecord {
        AccountRecord {
            name: self.name.clone(),
            enabled: self.enabled,
            locked: self.locked,
            role: self.role_id.clone(),
            username: self.user_name.clone(),
        }
    }
}

/// `Managers/{id}/Jobs/{job}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct JobStatus {
    pub id: String,
    pub name: String,
    pub job_state: String,
    pub job_type: String,
    pub message: String,
    pub percent_complete: Option<u32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
