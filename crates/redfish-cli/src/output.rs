//! Output formatting for redfishctl (table, json, csv)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print a warning message
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let table = Table::new(data).to_string();
                    println!("{}", table);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Csv => {
                print_csv(data);
            }
        }
    }

    /// Print any serializable value; tables fall back to pretty JSON
    pub fn print_value<T: Serialize>(&self, data: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
        );
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Csv => {
                let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
                println!("{}", keys.join(","));
                let values: Vec<String> = pairs.iter().map(|(_, v)| escape_csv(v)).collect();
                println!("{}", values.join(","));
            }
        }
    }
}

/// Print data as CSV
fn print_csv<T: Serialize>(data: &[T]) {
    if data.is_empty() {
        return;
    }

    // Field names come from the first item
    let first = serde_json::to_value(&data[0]).unwrap_or_default();
    if let serde_json::Value::Object(map) = &first {
        let headers: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
        println!("{}", headers.join(","));

        for item in data {
            if let Ok(serde_json::Value::Object(row)) = serde_json::to_value(item) {
                let values: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        row.get(*h)
                            .map(|v| match v {
                                serde_json::Value::String(s) => escape_csv(s),
                                other => escape_csv(&other.to_string()),
                            })
                            .unwrap_or_default()
                    })
                    .collect();
                println!("{}", values.join(","));
            }
        }
    }
}

/// Escape a value for CSV output
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a health string, colored by severity
pub fn health_cell(health: &str) -> String {
    match health {
        "OK" => health.green().to_string(),
        "Warning" => health.yellow().to_string(),
        "Critical" => health.red().to_string(),
        "" => "-".to_string(),
        other => other.to_string(),
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Health rollup row
#[derive(Debug, Tabled, Serialize)]
pub struct HealthRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Health")]
    pub health: String,
    #[tabled(rename = "State")]
    pub state: String,
}

impl HealthRow {
    pub fn new(record: redfish_client::HealthRecord, colored: bool) -> Self {
        Self {
            health: if colored {
                health_cell(&record.health)
            } else {
                record.health
            },
            name: record.name,
            state: record.state,
        }
    }
}

/// Storage controller or drive row
#[derive(Debug, Tabled, Serialize)]
pub struct StorageRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Health")]
    pub health: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Capacity (GB)")]
    pub capacity_gb: String,
}

impl From<redfish_client::StorageRecord> for StorageRow {
    fn from(r: redfish_client::StorageRecord) -> Self {
        Self {
            name: r.name,
            health: r.health,
            state: r.state,
            capacity_gb: if r.capacity_bytes == 0 {
                "-".to_string()
            } else {
                format!("{:.1}", r.capacity_bytes as f64 / 1e9)
            },
        }
    }
}

/// Physical drive details row
#[derive(Debug, Tabled, Serialize)]
pub struct DriveRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Model")]
    pub model: String,
    #[tabled(rename = "Media")]
    pub media_type: String,
    #[tabled(rename = "Protocol")]
    pub protocol: String,
    #[tabled(rename = "Serial")]
    pub serial_number: String,
    #[tabled(rename = "Capacity (bytes)")]
    pub capacity_bytes: u64,
}

/// Firmware inventory row
#[derive(Debug, Tabled, Serialize)]
pub struct FirmwareRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Version")]
    pub version: String,
    #[tabled(rename = "Updateable")]
    pub updateable: String,
    #[tabled(rename = "ID")]
    pub id: String,
}

impl From<redfish_client::FirmwareRecord> for FirmwareRow {
    fn from(r: redfish_client::FirmwareRecord) -> Self {
        Self {
            name: r.name,
            version: r.version,
            updateable: yes_no(r.updateable),
            id: r.id,
        }
    }
}

/// Network interface row
#[derive(Debug, Tabled, Serialize)]
pub struct NicRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "MAC")]
    pub mac_address: String,
    #[tabled(rename = "Health")]
    pub health: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "VLAN")]
    pub vlan: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl From<redfish_client::NetworkInterfaceRecord> for NicRow {
    fn from(r: redfish_client::NetworkInterfaceRecord) -> Self {
        let vlan = match (r.vlan_enabled, r.vlan_id) {
            (true, Some(id)) => id.to_string(),
            (true, None) => "enabled".to_string(),
            (false, _) => "-".to_string(),
        };
        Self {
            name: r.name,
            mac_address: r.mac_address,
            health: r.health,
            state: r.state,
            vlan,
            description: r.description,
        }
    }
}

/// User account row
#[derive(Debug, Tabled, Serialize)]
pub struct AccountRow {
    #[tabled(rename = "User")]
    pub username: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Enabled")]
    pub enabled: String,
    #[tabled(rename = "Locked")]
    pub locked: String,
}

impl From<redfish_client::AccountRecord> for AccountRow {
    fn from(r: redfish_client::AccountRecord) -> Self {
        Self {
            username: r.username,
            role: r.role,
            enabled: yes_no(r.enabled),
            locked: yes_no(r.locked),
        }
    }
}

/// Job queue row
#[derive(Debug, Tabled, Serialize)]
pub struct JobRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Progress")]
    pub progress: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<redfish_client::JobStatus> for JobRow {
    fn from(j: redfish_client::JobStatus) -> Self {
        Self {
            id: j.id,
            name: j.name,
            state: j.job_state,
            progress: j
                .percent_complete
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "-".to_string()),
            message: j.message,
        }
    }
}

/// Boot sequence row
#[derive(Debug, Tabled, Serialize)]
pub struct BootRow {
    #[tabled(rename = "#")]
    pub index: u32,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Enabled")]
    pub enabled: String,
}

impl From<redfish_client::BootSource> for BootRow {
    fn from(b: redfish_client::BootSource) -> Self {
        Self {
            index: b.index,
            name: b.name,
            enabled: yes_no(b.enabled),
        }
    }
}

/// System event log row
#[derive(Debug, Tabled, Serialize)]
pub struct EventRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Sensor")]
    pub sensor_type: String,
    #[tabled(rename = "Code")]
    pub entry_code: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<redfish_client::EventLogEntry> for EventRow {
    fn from(e: redfish_client::EventLogEntry) -> Self {
        Self {
            name: e.name,
            severity: e.severity,
            sensor_type: e.sensor_type,
            entry_code: e.entry_code,
            message: e.message,
        }
    }
}

/// Attribute name/value row
#[derive(Debug, Tabled, Serialize)]
pub struct AttributeRow {
    #[tabled(rename = "Attribute")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_storage_row_capacity() {
        let controller = StorageRow::from(redfish_client::StorageRecord {
            name: "RAID.Integrated.1-1".to_string(),
            ..Default::default()
        });
        assert_eq!(controller.capacity_gb, "-");

        let drive = StorageRow::from(redfish_client::StorageRecord {
            name: "Disk 0".to_string(),
            capacity_bytes: 480_000_000_000,
            ..Default::default()
        });
        assert_eq!(drive.capacity_gb, "480.0");
    }

    #[test]
    fn test_nic_row_vlan() {
        let row = NicRow::from(redfish_client::NetworkInterfaceRecord {
            vlan_enabled: true,
            vlan_id: Some(42),
            ..Default::default()
        });
        assert_eq!(row.vlan, "42");
    }
}
