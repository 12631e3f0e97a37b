//! Asynchronous task models
//!
//! Long-running actions (configuration export, for example) answer the
//! submitting POST with a `Location` header naming a task resource. The task
//! resource reports `{"TaskState": ...}`; `Running` is the only non-terminal
//! value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::odata::ResourceReference;

/// Handle of an in-flight task, taken from the `Location` response header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle(ResourceReference);

impl TaskHandle {
    pub fn new(reference: impl Into<ResourceReference>) -> Self {
        Self(reference.into())
    }

    pub fn reference(&self) -> &ResourceReference {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task state as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Running,
    Terminal(String),
}

impl TaskState {
    const FAILURE_STATES: &'static [&'static str] =
        &["Exception", "Killed", "Cancelled", "Interrupted", "Failed"];

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Terminal states the service uses to report that the task did not succeed
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Running => false,
            Self::Terminal(state) => Self::FAILURE_STATES.contains(&state.as_str()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "Running",
            Self::Terminal(state) => state,
        }
    }
}

impl Default for TaskState {
    // A missing TaskState ends polling
    fn default() -> Self {
        Self::Terminal(String::new())
    }
}

impl From<String> for TaskState {
    fn from(state: String) -> Self {
        if state == "Running" {
            Self::Running
        } else {
            Self::Terminal(state)
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal view of a task resource used to decide whether to keep polling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStatus {
    #[serde(rename = "TaskState")]
    pub state: TaskState,
}

/// Final result of a task together with the terminal state it ended in
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome<T> {
    pub state: TaskState,
    pub result: T,
}

impl<T> TaskOutcome<T> {
    pub fn is_failure(&self) -> bool {
        self.state.is_failure()
    }
}

/// Component selector for a system configuration export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportTarget {
    #[serde(rename = "ALL")]
    All,
    System,
    #[serde(rename = "BIOS")]
    Bios,
    #[serde(rename = "IDRAC")]
    Idrac,
    #[serde(rename = "NIC")]
    Nic,
    #[serde(rename = "FC")]
    Fc,
    LifecycleController,
    #[serde(rename = "RAID")]
    Raid,
}

impl ExportTarget {
    pub const ALL_TARGETS: [ExportTarget; 8] = [
        Self::All,
        Self::System,
        Self::Bios,
        Self::Idrac,
        Self::Nic,
        Self::Fc,
        Self::LifecycleController,
        Self::Raid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::System => "System",
            Self::Bios => "BIOS",
            Self::Idrac => "IDRAC",
            Self::Nic => "NIC",
            Self::Fc => "FC",
            Self::LifecycleController => "LifecycleController",
            Self::Raid => "RAID",
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_TARGETS
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown export target '{}'. Valid: ALL, System, BIOS, IDRAC, NIC, FC, LifecycleController, RAID",
                    s
                )
            })
    }
}

/// Body of the export-system-configuration action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRequest {
    pub export_format: String,
    pub share_parameters: ShareParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShareParameters {
    pub target: ExportTarget,
}

impl ExportRequest {
    /// JSON export of the given component
    pub fn json(target: ExportTarget) -> Self {
        Self {
            export_format: "JSON".to_string(),
            share_parameters: ShareParameters { target },
        }
    }
}

/// Exported system configuration, as served by the finished task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExportConfigResponse {
    pub system_configuration: SystemConfiguration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SystemConfiguration {
    pub model: String,
    pub service_tag: String,
    pub time_stamp: String,
    pub components: Vec<ConfigComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigComponent {
    #[serde(rename = "FQDD")]
    pub fqdd: String,
    pub attributes: Vec<ConfigAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigAttribute {
    pub name: String,
    pub value: serde_json::Value,
    #[serde(rename = "Set On Import")]
    pub set_on_import: Option<String>,
    pub comment: Option<String>,
}
