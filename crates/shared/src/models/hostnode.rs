use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Host id -> entry. Ordered so every pass over one snapshot visits hosts in the same order.
pub type Inventory = BTreeMap<String, HostnodeEntry>;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct HostnodeEntry {
    pub location: HostLocation,
    pub networking: Networking,
    pub specs: HostSpecs,
    pub status: HostStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct HostLocation {
    pub id: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<Datacenter>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Datacenter {
    pub name: String,
    pub tier: String,
}

impl fmt::Display for HostLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.city, self.region, self.country)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Networking {
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(default)]
    pub receive: Option<f64>,
    #[serde(default)]
    pub send: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_ip: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct HostSpecs {
    pub cpu: CpuOffer,
    pub ram: ResourceOffer,
    pub storage: ResourceOffer,
    #[serde(default)]
    pub gpu: BTreeMap<String, GpuOffer>,
    /// Keyed by requested GPU count ("1".."8").
    #[serde(default)]
    pub restrictions: BTreeMap<String, ResourceRestriction>,
}

impl HostSpecs {
    pub fn restriction_for(&self, gpu_count: u32) -> Option<&ResourceRestriction> {
        self.restrictions.get(&gpu_count.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct CpuOffer {
    pub amount: u32,
    #[serde(rename = "type", default)]
    pub cpu_type: String,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ResourceOffer {
    pub amount: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct GpuOffer {
    pub amount: u32,
    pub price: f64,
    #[serde(default)]
    pub vram: u32,
    #[serde(default)]
    pub rtx: bool,
    #[serde(default)]
    pub gtx: bool,
    #[serde(default)]
    pub pcie: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ResourceRestriction {
    pub cpu: Bounds,
    pub ram: Bounds,
    pub storage: Bounds,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct HostStatus {
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub listed: bool,
    /// Reserved for the requesting organization.
    #[serde(default)]
    pub reserved: bool,
    #[serde(default)]
    pub uptime: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// Parameters of the provider's stock query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventoryQuery {
    pub min_gpu_count: u32,
    pub min_ram: u32,
    pub min_vcpus: u32,
    pub min_storage: u32,
    pub min_vram: Option<u32>,
    pub requires_rtx: bool,
    pub subdomain: Option<String>,
    pub domain: Option<String>,
}

impl InventoryQuery {
    /// Query pairs in the order the provider documents them. Optional filters are
    /// only sent when they narrow the result.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("minGPUCount", self.min_gpu_count.to_string()),
            ("minRAM", self.min_ram.to_string()),
            ("minvCPUs", self.min_vcpus.to_string()),
            ("minStorage", self.min_storage.to_string()),
        ];
        if let Some(vram) = self.min_vram.filter(|v| *v > 0) {
            pairs.push(("minVRAM", vram.to_string()));
        }
        if self.requires_rtx {
            pairs.push(("requiresRTX", "true".to_string()));
        }
        if let Some(subdomain) = self.subdomain.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("subdomain", subdomain.clone()));
        }
        if let Some(domain) = self.domain.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("domain", domain.clone()));
        }
        pairs
    }
}
