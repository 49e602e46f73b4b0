use crate::models::spec::DeploySpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One external -> internal port mapping, kept as typed so validation can
/// report on the raw text.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortForward {
    pub from: String,
    pub to: String,
}

impl PortForward {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeployRequest {
    pub specs: DeploySpec,
    pub hostnode: String,
    pub os: String,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub ssh_key: Option<String>,
    pub server_name: String,
    #[serde(default)]
    pub port_forwards: Vec<PortForward>,
    #[serde(default)]
    pub cloudinit_script: String,
}

fn bracketed<'a>(ports: impl Iterator<Item = &'a str>) -> String {
    format!("[{}]", ports.collect::<Vec<_>>().join(", "))
}

impl DeployRequest {
    /// Form fields in the shape the provisioning API expects. Empty optional
    /// values are left out entirely.
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("deployment_type", "local".to_string())];

        if let Some(password) = self.admin_password.as_ref().filter(|p| !p.is_empty()) {
            fields.push(("password", password.clone()));
        }
        if let Some(key) = self.ssh_key.as_ref().filter(|k| !k.is_empty()) {
            fields.push(("ssh_key", key.clone()));
        }

        fields.extend([
            ("name", self.server_name.clone()),
            ("vcpus", self.specs.vcpu.to_string()),
            ("storage", self.specs.storage.to_string()),
            ("ram", self.specs.ram.to_string()),
            ("gpu_count", self.specs.gpu_count.to_string()),
            ("gpu_model", self.specs.gpu_model.clone()),
            ("operating_system", self.os.clone()),
            ("hostnode", self.hostnode.clone()),
            (
                "external_ports",
                bracketed(self.port_forwards.iter().map(|p| p.from.as_str())),
            ),
            (
                "internal_ports",
                bracketed(self.port_forwards.iter().map(|p| p.to.as_str())),
            ),
        ]);

        if !self.cloudinit_script.is_empty() {
            fields.push(("cloudinit_script", self.cloudinit_script.clone()));
        }

        fields
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeployCost {
    pub total_price: f64,
    pub compute_price: f64,
    pub storage_price: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeployResponse {
    pub cost: DeployCost,
    pub ip: String,
    /// External port -> internal port.
    #[serde(default)]
    pub port_forwards: BTreeMap<String, String>,
    /// UUID of the new virtual machine.
    pub server: String,
}
