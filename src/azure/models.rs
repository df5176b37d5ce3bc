// src/azure/models.rs
//! Wire shapes of the ARM responses we read. Only the fields used by
//! discovery are modelled; everything else is ignored by serde.
use serde::Deserialize;
use std::collections::HashMap;

/// One page of an ARM list response
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupResource {
    pub name: String,
    pub location: String,
}

/// Entry of the generic `resources` listing
#[derive(Debug, Clone, Deserialize)]
pub struct GenericResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VirtualMachine {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: VirtualMachineProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    #[serde(default)]
    pub vm_id: Option<String>,
    #[serde(default)]
    pub network_profile: Option<NetworkProfile>,
    #[serde(default)]
    pub instance_view: Option<InstanceView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterfaceReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterfaceReference {
    pub id: String,
    #[serde(default)]
    pub properties: Option<NetworkInterfaceReferenceProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterfaceReferenceProperties {
    #[serde(default)]
    pub primary: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceView {
    #[serde(default)]
    pub statuses: Vec<InstanceViewStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceViewStatus {
    #[serde(default)]
    pub code: Option<String>,
}

pub const POWER_STATE_PREFIX: &str = "PowerState/";
pub const POWER_STATE_RUNNING: &str = "PowerState/running";

impl VirtualMachine {
    /// Power state code from the instance view, e.g. `PowerState/running`.
    ///
    /// Looks for the first status carrying the `PowerState/` prefix rather than
    /// trusting its position in the list.
    pub fn power_state(&self) -> Option<&str> {
        self.properties
            .instance_view
            .as_ref()?
            .statuses
            .iter()
            .filter_map(|s| s.code.as_deref())
            .find(|code| code.starts_with(POWER_STATE_PREFIX))
    }

    pub fn is_running(&self) -> bool {
        self.power_state() == Some(POWER_STATE_RUNNING)
    }

    /// Interface flagged primary, else the first attached one
    pub fn primary_network_interface(&self) -> Option<&NetworkInterfaceReference> {
        let nics = &self.properties.network_profile.as_ref()?.network_interfaces;
        nics.iter()
            .find(|nic| {
                nic.properties
                    .as_ref()
                    .and_then(|p| p.primary)
                    .unwrap_or(false)
            })
            .or_else(|| nics.first())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkInterface {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: NetworkInterfaceProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
    #[serde(default)]
    pub ip_configurations: Vec<IpConfiguration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpConfiguration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: IpConfigurationProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpConfigurationProperties {
    #[serde(rename = "privateIPAddress", default)]
    pub private_ip_address: Option<String>,
    #[serde(rename = "publicIPAddress", default)]
    pub public_ip_address: Option<SubResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubResource {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicIpAddress {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: PublicIpAddressProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddressProperties {
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// ARM error envelope: `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Resource group and name pulled out of a full ARM resource ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub resource_group: Option<String>,
    pub name: String,
}

impl ResourceId {
    /// Parse `/subscriptions/{s}/resourceGroups/{g}/providers/{ns}/{type}/{name}`.
    ///
    /// The `resourceGroups` segment is matched case-insensitively since ARM
    /// returns both spellings. The name is always the last segment.
    pub fn parse(id: &str) -> Option<Self> {
        let segments: Vec<&str> = id.split('/').filter(|s| !s.is_empty()).collect();
        let name = segments.last()?.to_string();
        let resource_group = segments
            .windows(2)
            .find(|pair| pair[0].eq_ignore_ascii_case("resourceGroups"))
            .map(|pair| pair[1].to_string());
        Some(Self {
            resource_group,
            name,
        })
    }
}
