use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct VmGpu {
    #[serde(rename = "type", default)]
    pub gpu_type: Option<String>,
    pub amount: u32,
}

/// Provider figures come back as strings; they are displayed, not computed with.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct VmSpecs {
    pub gpu: VmGpu,
    pub vcpus: String,
    pub ram: String,
    pub storage: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct VirtualMachineEntry {
    pub status: String,
    pub name: String,
    pub specs: VmSpecs,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub hostnode: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub port_forwards: BTreeMap<String, String>,
    #[serde(default)]
    pub total_price: String,
    #[serde(default)]
    pub timestamp_creation: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub dedicated_ip_address: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

impl VirtualMachineEntry {
    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case("running")
    }

    pub fn reachable_ip(&self) -> Option<&str> {
        self.dedicated_ip_address
            .as_deref()
            .filter(|ip| !ip.is_empty())
            .or(self.ip_address.as_deref())
    }
}
