//! System event log (SEL) layouts
//!
//! Older controller firmware nests `EntryCode` and `SensorType` as
//! one-element lists of `{"Member": ...}` objects; newer firmware exposes
//! them as plain strings. The layout is picked from the firmware version
//! with [`event_log_rules`].

use serde::{Deserialize, Serialize};

use crate::version::{Comparator, FirmwareVersion, SchemaRules, VersionConstraint};

/// Event log body layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLayout {
    /// Nested `[{"Member": ...}]` entry code and sensor type
    V1,
    /// Scalar entry code and sensor type
    V2,
}

/// Version rules selecting the SEL layout
///
/// `<= 3.15.17.15` → V1, `<= 3.21.26.22` → V2, `> 3.21.26.22` → V2.
pub fn event_log_rules() -> SchemaRules<LogLayout> {
    let last_v1 = FirmwareVersion::from_components(&[3, 15, 17, 15]);
    let boundary = FirmwareVersion::from_components(&[3, 21, 26, 22]);

    SchemaRules::new()
        .with_rule(VersionConstraint::new(Comparator::Le, last_v1), LogLayout::V1)
        .with_rule(
            VersionConstraint::new(Comparator::Le, boundary.clone()),
            LogLayout::V2,
        )
        .with_rule(VersionConstraint::new(Comparator::Gt, boundary), LogLayout::V2)
}

/// Normalized event log entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub entry_code: String,
    pub message: String,
    pub name: String,
    pub sensor_type: String,
    pub severity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MemberValue {
    pub member: String,
}

/// Log collection in the V1 layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventLogV1 {
    pub members: Vec<EventLogEntryV1>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventLogEntryV1 {
    pub entry_code: Vec<MemberValue>,
    pub message: String,
    pub name: String,
    pub sensor_type: Vec<MemberValue>,
    pub severity: String,
}

/// Log collection in the V2 layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventLogV2 {
    pub members: Vec<EventLogEntryV2>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EventLogEntryV2 {
    pub entry_code: String,
    pub message: String,
    pub name: String,
    pub sensor_type: String,
    pub severity: String,
}

fn first_member(values: &[MemberValue]) -> String {
    values
        .first()
        .map(|v| v.member.clone())
        .unwrap_or_default()
}

impl From<EventLogV1> for Vec<EventLogEntry> {
    fn from(log: EventLogV1) -> Self {
        log.members
            .into_iter()
            .map(|m| EventLogEntry {
                entry_code: first_member(&m.entry_code),
                sensor_type: first_member(&m.sensor_type),
                message: m.message,
                name: m.name,
                severity: m.severity,
            })
            .collect()
    }
}

impl From<EventLogV2> for Vec<EventLogEntry> {
    fn from(log: EventLogV2) -> Self {
        log.members
            .into_iter()
            .map(|m| EventLogEntry {
                entry_code: m.entry_code,
                message: m.message,
                name: m.name,
                sensor_type: m.sensor_type,
                severity: m.severity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::select_schema;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rules_pick_layout() {
        let rules = event_log_rules();
        assert_eq!(select_schema("3.15.17.15", &rules).unwrap(), LogLayout::V1);
        assert_eq!(select_schema("3.21.26.22", &rules).unwrap(), LogLayout::V2);
        assert_eq!(select_schema("3.21.26.23", &rules).unwrap(), LogLayout::V2);
    }

    #[test]
    fn test_v1_entries_unwrap_members() {
        let json = r#"{"Members": [{
            "EntryCode": [{"Member": "Assert"}],
            "SensorType": [{"Member": "Power Supply"}],
            "Message": "Power supply redundancy is lost.",
            "Name": "Log Entry 12",
            "Severity": "Critical"
        }]}"#;
        let log: EventLogV1 = serde_json::from_str(json).unwrap();
        let entries: Vec<EventLogEntry> = log.into();
        assert_eq!(entries[0].entry_code, "Assert");
        assert_eq!(entries[0].sensor_type, "Power Supply");
        assert_eq!(entries[0].severity, "Critical");
    }

    #[test]
    fn test_v1_empty_member_lists() {
        let json = r#"{"Members": [{"EntryCode": [], "Name": "Log Entry 1"}]}"#;
        let log: EventLogV1 = serde_json::from_str(json).unwrap();
        let entries: Vec<EventLogEntry> = log.into();
        assert_eq!(entries[0].entry_code, "");
        assert_eq!(entries[0].sensor_type, "");
    }

    #[test]
    fn test_v2_scalars() {
        let json = r#"{"Members": [{
            "EntryCode": "Deassert", "SensorType": "Temperature",
            "Message": "ok", "Name": "Log Entry 3", "Severity": "OK"
        }]}"#;
        let log: EventLogV2 = serde_json::from_str(json).unwrap();
        let entries: Vec<EventLogEntry> = log.into();
        assert_eq!(entries[0].entry_code, "Deassert");
        assert_eq!(entries[0].sensor_type, "Temperature");
    }

    #[test]
    fn test_layouts_are_incompatible() {
        let v2_body = r#"{"Members": [{"EntryCode": "Assert"}]}"#;
        assert!(serde_json::from_str::<EventLogV1>(v2_body).is_err());
    }
}
