// src/azure/mod.rs
mod az;
mod client;
pub mod models;
mod session;

use async_trait::async_trait;
use std::future::Future;

pub use client::ArmClient;
pub use models::{
    GenericResource, GroupResource, NetworkInterface, Page, PublicIpAddress, ResourceId,
    VirtualMachine,
};
pub use session::{Authorizer, Endpoints, Session, AUTH_LOCATION_ENV};

use crate::error::Result;

/// Read-only slice of the Azure Resource Manager API used for discovery.
///
/// List operations are paged: pass `None` for the first page and the
/// previous page's `next_link` for the following ones.
#[async_trait]
pub trait ArmApi: Send + Sync {
    async fn resource_groups(&self, next_link: Option<String>) -> Result<Page<GroupResource>>;

    /// Resources of type `Microsoft.Compute/virtualMachines` in `group`
    async fn virtual_machine_resources(
        &self,
        group: &str,
        next_link: Option<String>,
    ) -> Result<Page<GenericResource>>;

    /// VM with its instance view expanded
    async fn virtual_machine(&self, group: &str, name: &str) -> Result<VirtualMachine>;

    async fn network_interface(&self, group: &str, name: &str) -> Result<NetworkInterface>;

    async fn public_ip_address(&self, group: &str, name: &str) -> Result<PublicIpAddress>;
}

/// Walk a paged listing to the end. The first failing page aborts the walk.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut next_link = None;
    loop {
        let page = fetch(next_link.take()).await?;
        items.extend(page.value);
        match page.next_link {
            Some(link) if !link.is_empty() => next_link = Some(link),
            _ => return Ok(items),
        }
    }
}
