use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware a user asks for. Built per form submission, never persisted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct DeploySpec {
    pub gpu_model: String,
    pub gpu_count: u32,
    /// GB
    pub ram: u32,
    pub vcpu: u32,
    /// GB
    pub storage: u32,
}

impl fmt::Display for DeploySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x {}, {} vCPUs, {} GB RAM, {} GB storage",
            self.gpu_count, self.gpu_model, self.vcpu, self.ram, self.storage
        )
    }
}
