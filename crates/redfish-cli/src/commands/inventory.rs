//! Inventory listing commands

use anyhow::Result;
use redfish_client::RedfishClient;

use crate::output::{AccountRow, BootRow, DriveRow, FirmwareRow, NicRow, OutputContext};

/// List installed firmware components
pub async fn firmware(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<FirmwareRow> = client
        .firmware_inventory()
        .await?
        .into_iter()
        .map(FirmwareRow::from)
        .collect();
    ctx.print(&rows);
    Ok(())
}

/// List physical drives behind every storage controller
pub async fn drives(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<DriveRow> = client
        .storage_drives()
        .await?
        .into_iter()
        .map(|d| DriveRow {
            id: d.id,
            model: d.model,
            media_type: d.media_type,
            protocol: d.protocol,
            serial_number: d.serial_number,
            capacity_bytes: d.capacity_bytes,
        })
        .collect();
    ctx.print(&rows);
    Ok(())
}

pub async fn nics(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<NicRow> = client
        .network_interfaces()
        .await?
        .into_iter()
        .map(NicRow::from)
        .collect();
    ctx.print(&rows);
    Ok(())
}

/// List configured user accounts (empty slots are skipped)
pub async fn users(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<AccountRow> = client
        .user_accounts()
        .await?
        .into_iter()
        .filter(|a| !a.username.is_empty())
        .map(AccountRow::from)
        .collect();
    ctx.print(&rows);
    Ok(())
}

pub async fn boot(client: &RedfishClient, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<BootRow> = client
        .boot_order()
        .await?
        .into_iter()
        .map(BootRow::from)
        .collect();
    ctx.print(&rows);
    Ok(())
}
