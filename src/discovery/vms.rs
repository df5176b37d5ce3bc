// src/discovery/vms.rs
use std::sync::Arc;
use tracing::{debug, info};

use super::{fan_out, Discoverer, RunningVm, TagFilter, VmCandidate};
use crate::azure::{collect_pages, ArmApi, GenericResource};
use crate::error::Result;

impl Discoverer {
    /// Running VMs in `group` whose tags satisfy `filter`, in listing order.
    ///
    /// Tags are checked before any instance view is fetched. Power state is
    /// probed concurrently; one failed probe fails the whole call.
    #[tracing::instrument(name = "discover_running_vms", skip(self))]
    pub async fn discover_running_vms(
        &self,
        group: &str,
        filter: &TagFilter,
    ) -> Result<Vec<RunningVm>> {
        let api = self.api.as_ref();
        let resources = self
            .until_shutdown(collect_pages(|link| api.virtual_machine_resources(group, link)))
            .await?;
        let listed = resources.len();
        let candidates = filter_candidates(resources, filter);
        debug!(listed, matched = candidates.len(), "filtered vm candidates by tags");

        let probed = fan_out(candidates, self.concurrency, &self.shutdown, |candidate| {
            let api = Arc::clone(&self.api);
            let group = group.to_string();
            async move { probe(api.as_ref(), &group, candidate).await }
        })
        .await?;

        let running: Vec<RunningVm> = probed.into_iter().flatten().collect();
        info!(running = running.len(), "discovered running vms");
        Ok(running)
    }
}

/// Keep the listed resources whose tags satisfy `filter`
pub fn filter_candidates(resources: Vec<GenericResource>, filter: &TagFilter) -> Vec<VmCandidate> {
    resources
        .into_iter()
        .filter(|resource| filter.matches(resource.tags.as_ref()))
        .map(|resource| VmCandidate {
            name: resource.name,
            tags: resource.tags.unwrap_or_default(),
            resource_id: resource.id,
        })
        .collect()
}

async fn probe(api: &dyn ArmApi, group: &str, candidate: VmCandidate) -> Result<Option<RunningVm>> {
    let vm = api.virtual_machine(group, &candidate.name).await?;

    if !vm.is_running() {
        debug!(vm = %candidate.name, power_state = ?vm.power_state(), "skipping vm that is not running");
        return Ok(None);
    }

    let network_interface_id = vm.primary_network_interface().map(|nic| nic.id.clone());
    let instance_id = vm
        .properties
        .vm_id
        .clone()
        .unwrap_or(candidate.resource_id);

    Ok(Some(RunningVm {
        name: candidate.name,
        instance_id,
        network_interface_id,
    }))
}
