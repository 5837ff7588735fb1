//! Configuration loading from constable.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::{fs, path::Path};

/// Main configuration structure for constable.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ConstableConfig {
    /// Rule tuning: disables and severity overrides.
    pub rules: Option<RulesConfig>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Rule configuration under `[rules]`.
#[derive(Debug, Deserialize, Default)]
pub struct RulesConfig {
    /// Rules to disable, by id or name.
    pub disabled: Option<Vec<String>>,
    /// Severity overrides under `[rules.severity]`, rule id or name to
    /// "info" or "warning".
    pub severity: Option<HashMap<String, String>>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from constable.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<ConstableConfig>> {
    let path = root.join("constable.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid constable.toml")?;
    Ok(Some(cfg))
}
