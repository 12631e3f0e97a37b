//! Configuration export command

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use redfish_client::{ExportTarget, RedfishClient, RedfishError};

use crate::output::OutputContext;

/// Export the system configuration of `target`
///
/// Waits for the export task; Ctrl-C stops waiting without cancelling the
/// task on the controller.
pub async fn export(
    client: &RedfishClient,
    target: ExportTarget,
    out_file: Option<&Path>,
    ctx: &OutputContext,
) -> Result<()> {
    let pb = if ctx.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {elapsed} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Exporting {} configuration...", target));

    let cancel = interrupted(tokio::signal::ctrl_c());

    let outcome = match client
        .export_system_configuration_until(target, cancel)
        .await
    {
        Ok(outcome) => outcome,
        Err(RedfishError::Cancelled(_)) => {
            pb.finish_with_message("Cancelled");
            ctx.warn("Stopped waiting; the export task may still run on the controller");
            return Ok(());
        }
        Err(e) => {
            pb.finish_with_message("Export failed!");
            return Err(e).context("Configuration export failed");
        }
    };

    if outcome.is_failure() {
        pb.finish_with_message("Export failed!");
        bail!("Export task ended in state {}", outcome.state);
    }
    pb.finish_with_message("Complete!");

    let configuration = &outcome.result.system_configuration;
    ctx.info(&format!(
        "{} ({}) - {} component(s)",
        configuration.model,
        configuration.service_tag,
        configuration.components.len()
    ));

    match out_file {
        Some(path) => {
            let json = serde_json::to_string_pretty(&outcome.result)?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.success(&format!("Configuration written to {}", path.display()));
        }
        None => ctx.print_value(&outcome.result),
    }
    Ok(())
}

/// Resolve when `signal` fires; never resolve if the handler failed to
/// install
async fn interrupted<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable; export cannot be interrupted");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_interrupted_resolves_on_signal() {
        let fired = tokio::time::timeout(
            Duration::from_millis(100),
            interrupted(std::future::ready(Ok(()))),
        )
        .await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn test_failed_handler_never_cancels() {
        let failed = std::future::ready(Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no signal driver",
        )));
        let fired = tokio::time::timeout(Duration::from_millis(50), interrupted(failed)).await;
        assert!(fired.is_err());
    }
}
