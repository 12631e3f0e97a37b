//! Health rollup commands

use anyhow::Result;
use clap::ValueEnum;
use redfish_client::RedfishClient;

use crate::output::{HealthRow, OutputContext, OutputFormat, StorageRow};

/// Component group to roll up
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HealthKind {
    Processors,
    Power,
    Thermal,
    Storage,
    Firmware,
}

pub async fn health(
    client: &RedfishClient,
    kind: HealthKind,
    ctx: &OutputContext,
) -> Result<()> {
    let records = match kind {
        HealthKind::Processors => client.processor_health().await?,
        HealthKind::Power => client.power_health().await?,
        HealthKind::Thermal => client.thermal_health().await?,
        HealthKind::Firmware => client.firmware_health().await?,
        HealthKind::Storage => {
            let rows: Vec<StorageRow> = client
                .storage_health()
                .await?
                .into_iter()
                .map(StorageRow::from)
                .collect();
            ctx.print(&rows);
            return Ok(());
        }
    };

    // Color escapes only make sense in a terminal table
    let colored = ctx.format == OutputFormat::Table;
    let rows: Vec<HealthRow> = records
        .into_iter()
        .map(|r| HealthRow::new(r, colored))
        .collect();
    ctx.print(&rows);
    Ok(())
}
