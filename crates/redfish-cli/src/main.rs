//! redfishctl - Command-line tool for Redfish management controllers
//!
//! Reads inventory and health, toggles power, edits attributes and exports
//! configuration through the Redfish REST interface.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use redfish_client::{ExportTarget, RedfishClient};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::attributes::AttributeScope;
use crate::commands::{HealthKind, PowerAction};
use crate::config::{Config, ConnectionArgs, MergedConfig};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "redfishctl")]
#[command(author, version, about = "Redfish management controller CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Management controller URL
    #[arg(short, long, env = "REDFISH_SERVER")]
    server: Option<String>,

    /// Basic auth user name
    #[arg(short, long, env = "REDFISH_USER")]
    username: Option<String>,

    /// Basic auth password
    #[arg(short, long, env = "REDFISH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Configuration file path
    #[arg(short, long, env = "REDFISH_CONFIG")]
    config: Option<PathBuf>,

    /// YAML client configuration (resource ids, timeouts, parse mode)
    #[arg(long, env = "REDFISH_CLIENT_CONFIG")]
    client_config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the system summary
    Info,

    /// Check that the credentials are accepted
    Login,

    /// Power the host on or off, or show its power state
    Power {
        #[arg(value_enum, default_value = "status")]
        action: PowerAction,
    },

    /// Gracefully restart the management controller
    ResetManager,

    /// Health rollup for a component group
    Health {
        #[arg(value_enum)]
        kind: HealthKind,
    },

    /// List installed firmware
    Firmware,

    /// List physical drives
    Drives,

    /// List network interfaces
    Nics,

    /// List user accounts
    Users,

    /// List the job queue
    Jobs {
        /// Delete every job in the queue
        #[arg(long)]
        clear: bool,
    },

    /// Show the boot sequence
    Boot,

    /// Show attributes of a registry
    Attributes {
        #[arg(value_enum)]
        scope: AttributeScope,

        /// Only show attributes whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Set attributes of a registry
    Set {
        #[arg(value_enum)]
        scope: AttributeScope,

        /// Assignments as KEY=VALUE
        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,

        /// Queue a configuration job for staged BIOS changes
        #[arg(long)]
        apply: bool,
    },

    /// Show the system event log
    Logs {
        /// Decode for this controller firmware instead of asking the controller
        #[arg(long)]
        firmware_version: Option<String>,
    },

    /// Export the system configuration
    Export {
        /// Component: ALL, System, BIOS, IDRAC, NIC, FC, LifecycleController, RAID
        #[arg(default_value = "ALL")]
        target: ExportTarget,

        /// Write the exported JSON to a file
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(&ConnectionArgs {
        server: cli.server.clone(),
        username: cli.username.clone(),
        password: cli.password.clone(),
        insecure: cli.insecure,
        no_color: cli.no_color,
        client_config: cli.client_config.clone(),
    });

    let format = cli
        .output
        .or_else(|| {
            config
                .output
                .as_deref()
                .and_then(|s| OutputFormat::from_str(s, true).ok())
        })
        .unwrap_or_default();

    // Create output context
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);
    let client = create_client(&merged)?;

    // Execute command
    match &cli.command {
        Commands::Info => commands::info(&client, &ctx).await?,
        Commands::Login => commands::login(&client, &ctx).await?,
        Commands::Power { action } => commands::power(&client, *action, &ctx).await?,
        Commands::ResetManager => commands::reset_manager(&client, &ctx).await?,
        Commands::Health { kind } => commands::health(&client, *kind, &ctx).await?,
        Commands::Firmware => commands::firmware(&client, &ctx).await?,
        Commands::Drives => commands::drives(&client, &ctx).await?,
        Commands::Nics => commands::nics(&client, &ctx).await?,
        Commands::Users => commands::users(&client, &ctx).await?,
        Commands::Jobs { clear } => commands::jobs(&client, *clear, &ctx).await?,
        Commands::Boot => commands::boot(&client, &ctx).await?,

        Commands::Attributes { scope, filter } => {
            commands::attributes(&client, *scope, filter.as_deref(), &ctx).await?;
        }

        Commands::Set {
            scope,
            pairs,
            apply,
        } => {
            commands::set(&client, *scope, pairs, *apply, &ctx).await?;
        }

        Commands::Logs { firmware_version } => {
            commands::logs(&client, firmware_version.as_deref(), &ctx).await?;
        }

        Commands::Export { target, out } => {
            commands::export(&client, *target, out.as_deref(), &ctx).await?;
        }
    }

    Ok(())
}

/// Create a Redfish client from the merged configuration
fn create_client(merged: &MergedConfig) -> Result<RedfishClient> {
    let config = merged.client_config()?;
    tracing::debug!(server = %merged.server, system = %config.resources.system_id, "Connecting");
    RedfishClient::connect(config).context("Failed to create Redfish client")
}
