//! Configuration file handling for redfishctl

use anyhow::{Context, Result};
use redfish_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the CLI tool
///
/// ```toml
/// server = "https://10.0.0.5"
/// username = "root"
/// insecure = true
/// client_config = "/etc/redfishctl/r740.yaml"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default management controller URL
    pub server: Option<String>,
    /// Basic auth user name
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: Option<bool>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// YAML client configuration (resource ids, timeouts, parse mode)
    pub client_config: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("redfishctl");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: &ConnectionArgs) -> MergedConfig {
        MergedConfig {
            server: args
                .server
                .clone()
                .or_else(|| self.server.clone())
                .unwrap_or_else(|| "https://localhost".to_string()),
            username: args.username.clone().or_else(|| self.username.clone()),
            password: args.password.clone().or_else(|| self.password.clone()),
            insecure: args.insecure || self.insecure.unwrap_or(false),
            no_color: args.no_color || self.no_color.unwrap_or(false),
            client_config: args
                .client_config
                .clone()
                .or_else(|| self.client_config.clone()),
        }
    }
}

/// Connection-related values given on the command line or environment
#[derive(Debug, Clone, Default)]
pub struct ConnectionArgs {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub no_color: bool,
    pub client_config: Option<PathBuf>,
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub no_color: bool,
    pub client_config: Option<PathBuf>,
}

impl MergedConfig {
    /// Build the client configuration, layering connection values over the
    /// optional YAML file
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.client_config {
            Some(path) => ClientConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load client config: {}", path.display()))?,
            None => ClientConfig::builder(self.server.clone()).build(),
        };

        config.connection.base_url = self.server.clone();
        if self.username.is_some() {
            config.connection.username = self.username.clone();
            config.connection.password = self.password.clone();
        }
        config.connection.insecure |= self.insecure;
        Ok(config)
    }
}
