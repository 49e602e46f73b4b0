use crate::models::spec::DeploySpec;
use serde::{Deserialize, Serialize};

/// One fixed hardware bundle offered in the catalog flow.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeployConfiguration {
    pub gpu_count: u32,
    pub gpu_model: String,
    pub ram: u32,
    pub vcpu: u32,
    pub storage: u32,
    #[serde(default)]
    pub nvlink: bool,
    /// Gbps
    #[serde(default)]
    pub bandwidth: u32,
}

impl DeployConfiguration {
    pub fn spec(&self) -> DeploySpec {
        DeploySpec {
            gpu_model: self.gpu_model.clone(),
            gpu_count: self.gpu_count,
            ram: self.ram,
            vcpu: self.vcpu,
            storage: self.storage,
        }
    }
}

/// A preset after one matching run against an inventory snapshot.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PresetMatch {
    /// Position in the preset list; stable identity for selection state.
    pub index: usize,
    pub configuration: DeployConfiguration,
    pub hostnode: Option<String>,
    pub stock: bool,
    pub price: f64,
}

impl PresetMatch {
    pub fn out_of_stock(index: usize, configuration: DeployConfiguration) -> Self {
        Self {
            index,
            configuration,
            hostnode: None,
            stock: false,
            price: 0.0,
        }
    }
}
