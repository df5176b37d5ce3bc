use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = "sshmenu-azure";
pub const CONFIG_FILENAME: &str = "config.toml";

/// Secondary resource group variable, checked after AZURE_DEFAULTS_GROUP
pub const BASE_GROUP_ENV: &str = "AZURE_BASE_GROUP_NAME";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub public_ip: Option<bool>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub ssh_command: Option<String>,
    #[serde(default)]
    pub ssh_args: Vec<String>,
}

/// `$XDG_CONFIG_HOME/sshmenu-azure/config.toml` or the platform equivalent
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
    Ok(config)
}

/// Load config, distinguishing between "file not found" and "file invalid".
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config_from_path(path),
        _ => Ok(Config::default()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve resource group from args, AZURE_BASE_GROUP_NAME or config
pub fn resolve_resource_group(arg: Option<String>, config: &Config) -> Option<String> {
    resolve_resource_group_with(arg, std::env::var(BASE_GROUP_ENV).ok(), config)
}

fn resolve_resource_group_with(
    arg: Option<String>,
    base_env: Option<String>,
    config: &Config,
) -> Option<String> {
    non_empty(arg)
        .or_else(|| non_empty(base_env))
        .or_else(|| non_empty(config.resource_group.clone()))
}

/// Resolve location filter from args or config
pub fn resolve_location(arg: Option<String>, config: &Config) -> Option<String> {
    non_empty(arg).or_else(|| non_empty(config.location.clone()))
}
