// src/discovery/addresses.rs
use std::sync::Arc;
use tracing::{debug, info};

use super::{fan_out, Discoverer, RunningVm};
use crate::azure::{ArmApi, ResourceId};
use crate::error::{ApiError, Result};
use crate::records::{VmRecord, NO_PUBLIC_IP};

impl Discoverer {
    /// Resolve the private (or public) address of every VM.
    ///
    /// Output position `i` always belongs to `vms[i]`; ordinals are assigned
    /// from that position once every lookup has finished.
    #[tracing::instrument(name = "resolve_addresses", skip(self, vms), fields(vms = vms.len()))]
    pub async fn resolve_addresses(
        &self,
        group: &str,
        vms: Vec<RunningVm>,
        public_ip: bool,
    ) -> Result<Vec<VmRecord>> {
        let resolved = fan_out(vms, self.concurrency, &self.shutdown, |vm| {
            let api = Arc::clone(&self.api);
            let group = group.to_string();
            async move {
                let ip_address = resolve_one(api.as_ref(), &group, &vm, public_ip).await?;
                Ok((vm.name, ip_address))
            }
        })
        .await?;

        let records: Vec<VmRecord> = resolved
            .into_iter()
            .enumerate()
            .map(|(i, (name, ip_address))| VmRecord {
                ordinal: i + 1,
                name,
                ip_address,
            })
            .collect();

        info!(records = records.len(), "resolved vm addresses");
        Ok(records)
    }
}

/// Split an ARM ID into (group, name), using `fallback_group` when the ID
/// carries no resource group segment
fn locate(id: &str, fallback_group: &str) -> Option<(String, String)> {
    let parsed = ResourceId::parse(id)?;
    let group = parsed
        .resource_group
        .unwrap_or_else(|| fallback_group.to_string());
    Some((group, parsed.name))
}

async fn resolve_one(
    api: &dyn ArmApi,
    group: &str,
    vm: &RunningVm,
    public_ip: bool,
) -> Result<String> {
    let nic_id = vm.network_interface_id.as_deref().ok_or_else(|| {
        ApiError::new(
            format!("resolve address of '{}'", vm.name),
            "virtual machine has no network interface",
        )
    })?;
    let (nic_group, nic_name) = locate(nic_id, group).ok_or_else(|| {
        ApiError::new(
            format!("resolve address of '{}'", vm.name),
            format!("malformed network interface id '{}'", nic_id),
        )
    })?;

    let nic = api.network_interface(&nic_group, &nic_name).await?;
    let config = nic
        .properties
        .ip_configurations
        .into_iter()
        .next()
        .ok_or_else(|| {
            ApiError::new(
                format!("get network interface '{}'", nic_name),
                "network interface has no IP configuration",
            )
        })?
        .properties;

    if !public_ip {
        return config.private_ip_address.ok_or_else(|| {
            ApiError::new(
                format!("get network interface '{}'", nic_name),
                "IP configuration has no private address",
            )
            .into()
        });
    }

    let Some(reference) = config.public_ip_address else {
        debug!(vm = %vm.name, "no public ip attached");
        return Ok(NO_PUBLIC_IP.to_string());
    };
    let (ip_group, ip_name) = locate(&reference.id, group).ok_or_else(|| {
        ApiError::new(
            format!("resolve public IP of '{}'", vm.name),
            format!("malformed public IP id '{}'", reference.id),
        )
    })?;

    let address = api.public_ip_address(&ip_group, &ip_name).await?;
    Ok(address
        .properties
        .ip_address
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| NO_PUBLIC_IP.to_string()))
}
