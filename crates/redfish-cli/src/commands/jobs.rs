//! Job queue command

use anyhow::Result;
use redfish_client::RedfishClient;

use crate::output::{JobRow, OutputContext};

/// List the job queue, or delete every job in it
pub async fn jobs(client: &RedfishClient, clear: bool, ctx: &OutputContext) -> Result<()> {
    if clear {
        let count = client.clear_jobs().await?;
        ctx.success(&format!("Deleted {} job(s)", count));
        return Ok(());
    }

    let jobs = client.jobs().await?;
    if jobs.is_empty() {
        ctx.info("Job queue is empty");
        return Ok(());
    }

    let rows: Vec<JobRow> = jobs.into_iter().map(JobRow::from).collect();
    ctx.print(&rows);
    Ok(())
}
