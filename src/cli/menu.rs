use tracing::info;

use super::config::{resolve_location, resolve_resource_group, Config};
use super::Cli;
use crate::discovery::{Discoverer, TagFilter};
use crate::error::{Error, Result};
use crate::records::{VmRecord, GROUP_PATTERN, VM_PATTERN};
use crate::select::Presenter;

/// Settings for one menu run, merged from flags, environment and config file
#[derive(Debug, Clone, Default)]
pub struct MenuOptions {
    pub resource_group: Option<String>,
    pub location: Option<String>,
    pub tags: TagFilter,
    pub public_ip: bool,
}

impl MenuOptions {
    /// Fails with [`Error::TagFilter`] before anything touches the network
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self> {
        Ok(Self {
            resource_group: resolve_resource_group(cli.resource_group.clone(), config),
            location: resolve_location(cli.location.clone(), config),
            tags: TagFilter::parse(&cli.tags)?,
            public_ip: cli.public_ip || config.public_ip.unwrap_or(false),
        })
    }
}

/// Use the configured resource group, or let the operator pick one
pub async fn choose_group<P: Presenter>(
    discoverer: &Discoverer,
    presenter: &P,
    options: &MenuOptions,
) -> Result<String> {
    if let Some(group) = &options.resource_group {
        return Ok(group.clone());
    }

    let groups = discoverer.list_groups(options.location.as_deref()).await?;
    if groups.is_empty() {
        return Err(Error::NoTargets(match &options.location {
            Some(location) => format!("No resource groups found in location '{}'", location),
            None => "No resource groups found in subscription".to_string(),
        }));
    }

    let group = presenter.present("Select a resource group", &groups, GROUP_PATTERN)?;
    Ok(group.name)
}

/// Running VMs in `group` with their resolved addresses
pub async fn discover_targets(
    discoverer: &Discoverer,
    group: &str,
    options: &MenuOptions,
) -> Result<Vec<VmRecord>> {
    let running = discoverer
        .discover_running_vms(group, &options.tags)
        .await?;
    discoverer
        .resolve_addresses(group, running, options.public_ip)
        .await
}

/// Full interactive flow: group, discovery, then the VM picker
pub async fn select_target<P: Presenter>(
    discoverer: &Discoverer,
    presenter: &P,
    options: &MenuOptions,
) -> Result<VmRecord> {
    let group = choose_group(discoverer, presenter, options).await?;
    info!(group = %group, "using resource group");

    let records = discover_targets(discoverer, &group, options).await?;
    if records.is_empty() {
        return Err(Error::NoTargets(format!(
            "No running virtual machines found in resource group '{}'",
            group
        )));
    }

    presenter.present("Select a target", &records, VM_PATTERN)
}
