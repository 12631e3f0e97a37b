//! Status objects and the uniform health record

use serde::{Deserialize, Serialize};

/// `Status` object carried by most resources
///
/// Any field may be absent or `null` depending on the resource and firmware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Status {
    pub health: Option<String>,
    pub health_rollup: Option<String>,
    pub state: Option<String>,
}

impl Status {
    pub fn new(health: &str, state: &str) -> Self {
        Self {
            health: Some(health.to_string()),
            health_rollup: None,
            state: Some(state.to_string()),
        }
    }

    /// Health as a plain string, empty when unreported
    pub fn health_str(&self) -> &str {
        self.health.as_deref().unwrap_or_default()
    }

    /// State as a plain string, empty when unreported
    pub fn state_str(&self) -> &str {
        self.state.as_deref().unwrap_or_default()
    }

    pub fn is_ok(&self) -> bool {
        self.health.as_deref() == Some("OK")
    }
}

/// Uniform `{name, health, state}` summary unit of every health rollup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub name: String,
    pub health: String,
    pub state: String,
}

impl HealthRecord {
    pub fn new(name: impl Into<String>, status: &Status) -> Self {
        Self {
            name: name.into(),
            health: status.health_str().to_string(),
            state: status.state_str().to_string(),
        }
    }
}

/// Conversion of a wire resource into a summary record of type `R`
///
/// Implemented for every resource category the aggregator folds.
pub trait Summarize<R> {
    fn summarize(&self) -> R;
}

impl Summarize<HealthRecord> for HealthRecord {
    fn summarize(&self) -> HealthRecord {
        self.clone()
    }
}
