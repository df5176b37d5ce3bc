#![allow(dead_code)] // Test helpers appear unused when compiled independently

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use sshmenu_azure::azure::models::Page;
use sshmenu_azure::azure::{
    ArmApi, GenericResource, GroupResource, NetworkInterface, PublicIpAddress, VirtualMachine,
};
use sshmenu_azure::records::Listing;
use sshmenu_azure::select::Presenter;
use sshmenu_azure::{ApiError, Error, Result};

pub const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";

pub fn nic_id(group: &str, name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/networkInterfaces/{}",
        SUBSCRIPTION, group, name
    )
}

pub fn public_ip_id(group: &str, name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/publicIPAddresses/{}",
        SUBSCRIPTION, group, name
    )
}

/// VM definition used to seed [`MockArm`]
#[derive(Clone)]
pub struct MockVm {
    pub name: String,
    pub tags: Option<HashMap<String, String>>,
    pub power_state: String,
    pub private_ip: String,
    /// Attached public IP; an empty string models an unallocated address
    pub public_ip: Option<String>,
    pub has_nic: bool,
    /// Latency of the instance view call
    pub probe_delay: Duration,
    /// Latency of the network interface call
    pub nic_delay: Duration,
}

impl MockVm {
    pub fn running(name: &str, private_ip: &str) -> Self {
        Self {
            name: name.to_string(),
            tags: None,
            power_state: "PowerState/running".to_string(),
            private_ip: private_ip.to_string(),
            public_ip: None,
            has_nic: true,
            probe_delay: Duration::ZERO,
            nic_delay: Duration::ZERO,
        }
    }

    pub fn stopped(name: &str, private_ip: &str) -> Self {
        Self {
            power_state: "PowerState/deallocated".to_string(),
            ..Self::running(name, private_ip)
        }
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn public_ip(mut self, ip: &str) -> Self {
        self.public_ip = Some(ip.to_string());
        self
    }

    /// Public IP resource attached but with no address allocated
    pub fn unallocated_public_ip(mut self) -> Self {
        self.public_ip = Some(String::new());
        self
    }

    pub fn without_nic(mut self) -> Self {
        self.has_nic = false;
        self
    }

    pub fn probe_delay(mut self, ms: u64) -> Self {
        self.probe_delay = Duration::from_millis(ms);
        self
    }

    pub fn nic_delay(mut self, ms: u64) -> Self {
        self.nic_delay = Duration::from_millis(ms);
        self
    }

    fn nic_name(&self) -> String {
        format!("{}-nic", self.name)
    }

    fn public_ip_name(&self) -> String {
        format!("{}-ip", self.name)
    }
}

/// In-memory ARM double with call recording and injectable failures
pub struct MockArm {
    pub group: String,
    pub groups: Vec<(String, String)>,
    pub vms: Vec<MockVm>,
    /// Resource listing page size
    pub page_size: usize,
    /// Latency of every listing page
    pub list_delay: Duration,
    /// Names whose instance view or NIC lookup fails
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
    pub vm_requests: AtomicUsize,
}

impl MockArm {
    pub fn new(group: &str, vms: Vec<MockVm>) -> Self {
        Self {
            group: group.to_string(),
            groups: vec![(group.to_string(), "westeurope".to_string())],
            vms,
            page_size: 2,
            list_delay: Duration::ZERO,
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            vm_requests: AtomicUsize::new(0),
        }
    }

    pub fn with_groups(mut self, groups: &[(&str, &str)]) -> Self {
        self.groups = groups
            .iter()
            .map(|(n, l)| (n.to_string(), l.to_string()))
            .collect();
        self
    }

    pub fn list_delay(mut self, ms: u64) -> Self {
        self.list_delay = Duration::from_millis(ms);
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn find(&self, name: &str) -> Option<&MockVm> {
        self.vms.iter().find(|vm| vm.name == name)
    }

    fn not_found(operation: &str, name: &str) -> Error {
        ApiError::new(operation, format!("The Resource '{}' was not found.", name))
            .with_status(404)
            .with_code("ResourceNotFound")
            .into()
    }

    fn page<T: Clone>(items: &[T], link: Option<String>, size: usize) -> Page<T> {
        let start: usize = link.as_deref().map_or(0, |l| l.parse().unwrap());
        let end = (start + size).min(items.len());
        Page {
            value: items[start..end].to_vec(),
            next_link: (end < items.len()).then(|| end.to_string()),
        }
    }
}

#[async_trait]
impl ArmApi for MockArm {
    async fn resource_groups(&self, next_link: Option<String>) -> Result<Page<GroupResource>> {
        self.record(format!("groups {:?}", next_link));
        tokio::time::sleep(self.list_delay).await;
        let groups: Vec<GroupResource> = self
            .groups
            .iter()
            .map(|(name, location)| GroupResource {
                name: name.clone(),
                location: location.clone(),
            })
            .collect();
        Ok(Self::page(&groups, next_link, self.page_size))
    }

    async fn virtual_machine_resources(
        &self,
        group: &str,
        next_link: Option<String>,
    ) -> Result<Page<GenericResource>> {
        self.record(format!("resources {} {:?}", group, next_link));
        tokio::time::sleep(self.list_delay).await;
        if group != self.group {
            return Err(Self::not_found("list resources", group));
        }
        let resources: Vec<GenericResource> = self
            .vms
            .iter()
            .map(|vm| GenericResource {
                id: format!(
                    "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/{}",
                    SUBSCRIPTION, group, vm.name
                ),
                name: vm.name.clone(),
                tags: vm.tags.clone(),
            })
            .collect();
        Ok(Self::page(&resources, next_link, self.page_size))
    }

    async fn virtual_machine(&self, group: &str, name: &str) -> Result<VirtualMachine> {
        self.vm_requests.fetch_add(1, Ordering::SeqCst);
        self.record(format!("vm {}", name));
        let vm = self
            .find(name)
            .ok_or_else(|| Self::not_found("get virtual machine", name))?;
        tokio::time::sleep(vm.probe_delay).await;
        if self.failing.contains(name) {
            return Err(ApiError::new(
                format!("get virtual machine '{}'", name),
                "instance view unavailable",
            )
            .with_status(500)
            .into());
        }
        let nics: Vec<Value> = if vm.has_nic {
            vec![json!({"id": nic_id(group, &vm.nic_name())})]
        } else {
            Vec::new()
        };
        let body = json!({
            "id": format!("/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/{}", SUBSCRIPTION, group, name),
            "name": name,
            "properties": {
                "vmId": format!("vmid-{}", name),
                "networkProfile": {"networkInterfaces": nics},
                "instanceView": {"statuses": [
                    {"code": "ProvisioningState/succeeded"},
                    {"code": vm.power_state}
                ]}
            }
        });
        Ok(serde_json::from_value(body).unwrap())
    }

    async fn network_interface(&self, group: &str, name: &str) -> Result<NetworkInterface> {
        self.record(format!("nic {}", name));
        let vm = self
            .vms
            .iter()
            .find(|vm| vm.nic_name() == name)
            .ok_or_else(|| Self::not_found("get network interface", name))?;
        tokio::time::sleep(vm.nic_delay).await;
        if self.failing.contains(name) {
            return Err(ApiError::new(
                format!("get network interface '{}'", name),
                "network interface unavailable",
            )
            .into());
        }
        let mut ip_config: Value = json!({"privateIPAddress": vm.private_ip});
        if vm.public_ip.is_some() {
            ip_config["publicIPAddress"] = json!({"id": public_ip_id(group, &vm.public_ip_name())});
        }
        let body = json!({
            "name": name,
            "properties": {"ipConfigurations": [{"name": "ipconfig1", "properties": ip_config}]}
        });
        Ok(serde_json::from_value(body).unwrap())
    }

    async fn public_ip_address(&self, _group: &str, name: &str) -> Result<PublicIpAddress> {
        self.record(format!("pip {}", name));
        let vm = self
            .vms
            .iter()
            .find(|vm| vm.public_ip_name() == name)
            .ok_or_else(|| Self::not_found("get public IP address", name))?;
        let body = json!({
            "name": name,
            "properties": {"ipAddress": vm.public_ip.as_deref().filter(|ip| !ip.is_empty())}
        });
        Ok(serde_json::from_value(body).unwrap())
    }
}

/// Presenter that picks by name, or cancels when no name is scripted
pub struct ScriptedPresenter {
    picks: Mutex<Vec<Option<String>>>,
    pub shown: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPresenter {
    pub fn new(picks: &[Option<&str>]) -> Self {
        Self {
            picks: Mutex::new(picks.iter().rev().map(|p| p.map(str::to_string)).collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Vec<Vec<String>> {
        self.shown.lock().unwrap().clone()
    }
}

impl Presenter for ScriptedPresenter {
    fn present<T: Listing + Clone>(&self, _prompt: &str, items: &[T], pattern: &str) -> Result<T> {
        self.shown.lock().unwrap().push(
            items
                .iter()
                .map(|item| sshmenu_azure::records::render(pattern, item))
                .collect(),
        );
        let pick = self
            .picks
            .lock()
            .unwrap()
            .pop()
            .expect("presenter called more often than scripted");
        match pick {
            Some(name) => items
                .iter()
                .find(|item| item.name() == name)
                .cloned()
                .ok_or(Error::Cancelled),
            None => Err(Error::Cancelled),
        }
    }
}
