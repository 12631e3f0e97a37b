//! Attribute read and write commands

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use redfish_client::{AttributeTarget, RedfishClient};
use serde_json::Value;

use crate::output::{AttributeRow, OutputContext, OutputFormat};

/// Attribute registry to operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttributeScope {
    Bios,
    Idrac,
    Lc,
    System,
}

impl AttributeScope {
    fn manager_target(self) -> Option<AttributeTarget> {
        match self {
            Self::Bios => None,
            Self::Idrac => Some(AttributeTarget::Idrac),
            Self::Lc => Some(AttributeTarget::LifecycleController),
            Self::System => Some(AttributeTarget::System),
        }
    }
}

/// Show every attribute in a registry, optionally filtered by name
pub async fn attributes(
    client: &RedfishClient,
    scope: AttributeScope,
    filter: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let resource = match scope.manager_target() {
        None => client.bios_attributes().await?,
        Some(target) => client.manager_attributes(target).await?,
    };

    let filter = filter.map(str::to_lowercase);
    let selected: BTreeMap<String, Value> = resource
        .attributes
        .into_iter()
        .filter(|(name, _)| {
            filter
                .as_deref()
                .map_or(true, |f| name.to_lowercase().contains(f))
        })
        .collect();

    if ctx.format == OutputFormat::Json {
        ctx.print_value(&selected);
        return Ok(());
    }

    let rows: Vec<AttributeRow> = selected
        .into_iter()
        .map(|(name, value)| AttributeRow {
            name,
            value: display_value(&value),
        })
        .collect();
    ctx.print(&rows);
    Ok(())
}

/// Set attributes given as `KEY=VALUE` pairs
///
/// BIOS changes are staged on the settings resource; `apply` queues the
/// configuration job that commits them at the next reboot.
pub async fn set(
    client: &RedfishClient,
    scope: AttributeScope,
    pairs: &[String],
    apply: bool,
    ctx: &OutputContext,
) -> Result<()> {
    let attributes = parse_assignments(pairs)?;

    let message = match scope.manager_target() {
        None => client.set_bios_settings(&attributes).await?,
        Some(target) => {
            if apply {
                ctx.warn("--apply only affects BIOS settings; ignoring");
            }
            client.set_attributes(target, &attributes).await?
        }
    };
    ctx.success(&message);

    if apply && scope == AttributeScope::Bios {
        let settings = client.config().bios_settings_path();
        let job = client
            .create_job(&settings)
            .await
            .context("Failed to queue BIOS configuration job")?;
        ctx.success(&job);
    }
    Ok(())
}

fn parse_assignments(pairs: &[String]) -> Result<BTreeMap<String, Value>> {
    let mut attributes = BTreeMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Expected KEY=VALUE, got '{}'", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty attribute name in '{}'", pair);
        }
        attributes.insert(key.to_string(), parse_value(value)?);
    }
    Ok(attributes)
}

/// Interpret a value as JSON when it looks like one, else as a string
fn parse_value(value: &str) -> Result<Value> {
    let parsed = if value.starts_with('{')
        || value.starts_with('[')
        || value == "true"
        || value == "false"
        || value == "null"
    {
        serde_json::from_str(value).context("Failed to parse value as JSON")?
    } else if let Ok(num) = value.parse::<i64>() {
        Value::Number(num.into())
    } else {
        Value::String(value.to_string())
    };
    Ok(parsed)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_assignments() {
        let pairs = vec![
            "BootMode=Uefi".to_string(),
            "ProcCores=8".to_string(),
            "SriovGlobalEnable=true".to_string(),
            "Banner=a=b".to_string(),
        ];
        let parsed = parse_assignments(&pairs).unwrap();

        assert_eq!(parsed["BootMode"], json!("Uefi"));
        assert_eq!(parsed["ProcCores"], json!(8));
        assert_eq!(parsed["SriovGlobalEnable"], json!(true));
        assert_eq!(parsed["Banner"], json!("a=b"));
    }

    #[test]
    fn test_parse_assignments_rejects_bare_key() {
        assert!(parse_assignments(&["BootMode".to_string()]).is_err());
        assert!(parse_assignments(&["=Uefi".to_string()]).is_err());
    }

    #[test]
    fn test_scope_mapping() {
        assert_eq!(AttributeScope::Bios.manager_target(), None);
        assert_eq!(
            AttributeScope::Lc.manager_target(),
            Some(AttributeTarget::LifecycleController)
        );
    }
}
