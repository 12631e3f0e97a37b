//! System event log command

use anyhow::Result;
use redfish_client::RedfishClient;

use crate::output::{EventRow, OutputContext};

/// Show the system event log
///
/// The log layout depends on the controller firmware. When no version is
/// given it is read from the manager first.
pub async fn logs(
    client: &RedfishClient,
    firmware_version: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let entries = match firmware_version {
        Some(version) => client.system_event_logs(version).await?,
        None => client.system_event_logs_auto().await?,
    };

    let rows: Vec<EventRow> = entries.into_iter().map(EventRow::from).collect();
    ctx.print(&rows);
    Ok(())
}
