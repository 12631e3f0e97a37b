//! Health and inventory rollups
//!
//! Folds heterogeneous resource categories (power supplies, redundancy
//! groups, sensors, controllers, drives, ...) into one flat list of uniform
//! records. Empty categories contribute nothing; category order and
//! within-category order are preserved.

use redfish_core::{
    DriveResource, HealthRecord, PowerResource, StorageRecord, StorageResource, Summarize,
    ThermalResource,
};
use tracing::trace;

/// One labelled group of already summarized records
#[derive(Debug, Clone, PartialEq)]
pub struct Category<R> {
    pub label: &'static str,
    pub records: Vec<R>,
}

/// Flatten categories in order, skipping empty ones
pub fn aggregate<R>(categories: Vec<Category<R>>) -> Vec<R> {
    let mut out = Vec::with_capacity(categories.iter().map(|c| c.records.len()).sum());
    for category in categories {
        if category.records.is_empty() {
            trace!(label = category.label, "Skipping empty category");
            continue;
        }
        out.extend(category.records);
    }
    out
}

/// Builder collecting categories of resources that summarize to `R`
#[derive(Debug)]
pub struct Aggregator<R> {
    categories: Vec<Category<R>>,
}

impl<R> Default for Aggregator<R> {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
        }
    }
}

impl<R> Aggregator<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarize `items` and append them as a category
    pub fn category<T: Summarize<R>>(mut self, label: &'static str, items: &[T]) -> Self {
        self.categories.push(Category {
            label,
            records: items.iter().map(Summarize::summarize).collect(),
        });
        self
    }

    pub fn finish(self) -> Vec<R> {
        aggregate(self.categories)
    }
}

/// Power supplies, then redundancy groups, then voltage sensors
pub fn power_rollup(power: &PowerResource) -> Vec<HealthRecord> {
    Aggregator::new()
        .category("power_supplies", &power.power_supplies)
        .category("redundancy", &power.redundancy)
        .category("voltages", &power.voltages)
        .finish()
}

/// Redundancy groups, then fans, then temperature sensors
pub fn thermal_rollup(thermal: &ThermalResource) -> Vec<HealthRecord> {
    Aggregator::new()
        .category("redundancy", &thermal.redundancy)
        .category("fans", &thermal.fans)
        .category("temperatures", &thermal.temperatures)
        .finish()
}

/// Each controller followed by its drives
pub fn storage_rollup(controllers: &[(StorageResource, Vec<DriveResource>)]) -> Vec<StorageRecord> {
    controllers
        .iter()
        .fold(Aggregator::new(), |agg, (controller, drives)| {
            agg.category("controller", std::slice::from_ref(controller))
                .category("drives", drives)
        })
        .finish()
}
