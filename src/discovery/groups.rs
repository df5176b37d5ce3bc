// src/discovery/groups.rs
use tracing::debug;

use super::Discoverer;
use crate::azure::collect_pages;
use crate::error::Result;
use crate::records::ResourceGroup;

impl Discoverer {
    /// List resource groups in the subscription, optionally only those in
    /// `location` (exact, case-sensitive). Ordinals run 1..N after filtering.
    #[tracing::instrument(name = "list_groups", skip(self))]
    pub async fn list_groups(&self, location: Option<&str>) -> Result<Vec<ResourceGroup>> {
        let location = location.filter(|l| !l.is_empty());
        let api = self.api.as_ref();
        let groups = self
            .until_shutdown(collect_pages(|link| api.resource_groups(link)))
            .await?;
        let total = groups.len();

        let groups: Vec<ResourceGroup> = groups
            .into_iter()
            .filter(|group| location.map_or(true, |l| group.location == l))
            .enumerate()
            .map(|(i, group)| ResourceGroup {
                ordinal: i + 1,
                name: group.name,
                location: group.location,
            })
            .collect();

        debug!(total, kept = groups.len(), "listed resource groups");
        Ok(groups)
    }
}
