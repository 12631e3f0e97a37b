//! Power control commands

use anyhow::Result;
use clap::ValueEnum;
use redfish_client::RedfishClient;

use crate::output::OutputContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerAction {
    On,
    Off,
    Status,
}

/// Power the host on or off, or show its power state
pub async fn power(client: &RedfishClient, action: PowerAction, ctx: &OutputContext) -> Result<()> {
    match action {
        PowerAction::On => {
            client.power_on().await?;
            ctx.success("Power on requested");
        }
        PowerAction::Off => {
            client.power_off().await?;
            ctx.success("Forced power off requested");
        }
        PowerAction::Status => {
            let state = client.power_state().await?;
            ctx.print_kv(&[("PowerState", state)]);
        }
    }
    Ok(())
}

/// Gracefully restart the management controller
pub async fn reset_manager(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    client.restart_manager().await?;
    ctx.success("Management controller restart requested");
    ctx.warn("The controller will be unreachable for a few minutes");
    Ok(())
}
