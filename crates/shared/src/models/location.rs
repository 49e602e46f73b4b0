use crate::models::hostnode::{HostSpecs, HostnodeEntry};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Availability {
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Medium Stock")]
    MediumStock,
    #[serde(rename = "High Stock")]
    HighStock,
}

impl Availability {
    /// Eight unrented GPUs in one place counts as plenty.
    pub fn from_stock(stock: u32) -> Self {
        match stock {
            8.. => Self::HighStock,
            4..=7 => Self::MediumStock,
            _ => Self::LowStock,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowStock => write!(f, "Low Stock"),
            Self::MediumStock => write!(f, "Medium Stock"),
            Self::HighStock => write!(f, "High Stock"),
        }
    }
}

/// Identity of a location bucket: one site at one exact computed price.
///
/// The price is held as its bit pattern so two hosts only merge when their totals
/// are identical, not merely close.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub site_id: String,
    price_bits: u64,
}

impl LocationKey {
    pub fn new(site_id: impl Into<String>, price: f64) -> Self {
        // -0.0 and 0.0 are the same price
        let price = if price == 0.0 { 0.0 } else { price };
        Self {
            site_id: site_id.into(),
            price_bits: price.to_bits(),
        }
    }

    pub fn price(&self) -> f64 {
        f64::from_bits(self.price_bits)
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.site_id, self.price())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LocationHost {
    pub id: String,
    pub ports: Vec<u16>,
    pub specs: HostSpecs,
    pub reserved: bool,
    pub uptime: f64,
}

impl LocationHost {
    pub fn from_entry(id: &str, entry: &HostnodeEntry) -> Self {
        Self {
            id: id.to_string(),
            ports: entry.networking.ports.clone(),
            specs: entry.specs.clone(),
            reserved: entry.status.reserved,
            uptime: entry.status.uptime,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LocationInfo {
    pub availability: Availability,
    pub location: String,
    /// Total $/hr for the requested spec.
    pub price: f64,
    /// GPU model id, a key of the host's `specs.gpu`.
    pub gpu_type: String,
    /// GPUs summed over the merged hosts.
    pub stock: u32,
    pub cpu_type: String,
    pub hostnodes: Vec<LocationHost>,
}

impl LocationInfo {
    pub fn has_reserved_host(&self) -> bool {
        self.hostnodes.iter().any(|host| host.reserved)
    }

    pub fn contains_host(&self, host_id: &str) -> bool {
        self.hostnodes.iter().any(|host| host.id == host_id)
    }
}
