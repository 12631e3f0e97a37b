//! Info and login commands

use anyhow::Result;
use redfish_client::RedfishClient;

use crate::output::OutputContext;

/// Show the system summary
pub async fn info(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    let summary = client.system_info().await?;

    ctx.print_kv(&[
        ("Model", summary.model),
        ("Serial", summary.serial_number),
        ("Power", summary.power_state),
        ("Health", summary.health),
        (
            "Processors",
            format!("{} x {}", summary.processors, summary.processor_family),
        ),
        ("Memory (GiB)", format!("{:.1}", summary.memory_gib)),
    ]);

    Ok(())
}

/// Verify the credentials against the system resource
pub async fn login(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    let health = client.check_login().await?;
    ctx.success(&format!(
        "Logged in to {} (system health: {})",
        client.base_url(),
        health
    ));
    Ok(())
}
