// src/records.rs
use serde::{Deserialize, Serialize};

/// Display line for resource groups
pub const GROUP_PATTERN: &str = "{ordinal}.\t{name} ({location})";

/// Display line for virtual machines
pub const VM_PATTERN: &str = "{ordinal}. {ip}\t| {name}";

/// Shown instead of an address when a VM has no public IP
pub const NO_PUBLIC_IP: &str = "(no public ip)";

/// A row the picker can show and search
pub trait Listing {
    /// Field the search query is matched against
    fn name(&self) -> &str;

    /// Value for a `{key}` placeholder in a display pattern
    fn field(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub ordinal: usize,
    pub name: String,
    pub location: String,
}

impl Listing for ResourceGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "ordinal" => Some(self.ordinal.to_string()),
            "name" => Some(self.name.clone()),
            "location" => Some(self.location.clone()),
            _ => None,
        }
    }
}

/// Final, display-ready address of a running VM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmRecord {
    pub ordinal: usize,
    pub name: String,
    #[serde(rename = "ip")]
    pub ip_address: String,
}

impl Listing for VmRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "ordinal" => Some(self.ordinal.to_string()),
            "name" => Some(self.name.clone()),
            "ip" => Some(self.ip_address.clone()),
            _ => None,
        }
    }
}

/// Substitute `{key}` placeholders in `pattern` with the item's fields.
/// Unknown keys and unmatched braces are kept as written.
pub fn render(pattern: &str, item: &impl Listing) -> String {
    let mut out = String::with_capacity(pattern.len() + 32);
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match item.field(key) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
