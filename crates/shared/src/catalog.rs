//! Static hardware and software catalog.
//!
//! The storefront sells a fixed set of GPU models, OS templates and preset
//! bundles. The built-in data below can be replaced wholesale by a TOML file at
//! startup; after that the catalog is read-only and passed by reference to the
//! pricing and validation code.

use crate::models::deploy::PortForward;
use crate::models::preset::DeployConfiguration;
use crate::models::spec::DeploySpec;
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GpuInfo {
    pub display_name: String,
    pub short_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OsTemplate {
    pub display_name: String,
    pub features: String,
    #[serde(default)]
    pub min_storage_gb: Option<u32>,
    #[serde(default)]
    pub for_ai: bool,
}

/// Values offered in the spec pickers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SpecOptions {
    pub gpus: Vec<String>,
    pub operating_systems: Vec<String>,
    pub gpu_counts: Vec<u32>,
    pub ram_gb: Vec<u32>,
    pub vcpu_counts: Vec<u32>,
    pub storage_gb: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Catalog {
    pub gpus: BTreeMap<String, GpuInfo>,
    pub operating_systems: BTreeMap<String, OsTemplate>,
    pub options: SpecOptions,
    pub default_spec: DeploySpec,
    pub default_ports: Vec<PortForward>,
    pub presets: Vec<DeployConfiguration>,
}

impl Catalog {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse catalog")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            "Loaded catalog from {}: {} GPU models, {} presets",
            path.display(),
            catalog.options.gpus.len(),
            catalog.presets.len()
        );
        Ok(catalog)
    }

    pub fn gpu(&self, model: &str) -> Option<&GpuInfo> {
        self.gpus.get(model)
    }

    pub fn display_name<'a>(&'a self, model: &'a str) -> &'a str {
        self.gpu(model)
            .map(|info| info.display_name.as_str())
            .unwrap_or(model)
    }

    /// RTX-family models may only be served by offers flagged `rtx`.
    pub fn is_rtx_family(&self, model: &str) -> bool {
        self.gpu(model)
            .is_some_and(|info| info.display_name.contains("RTX"))
    }

    pub fn os(&self, name: &str) -> Option<&OsTemplate> {
        self.operating_systems.get(name)
    }

    pub fn is_allowed_gpu(&self, model: &str) -> bool {
        self.options.gpus.iter().any(|m| m == model)
    }

    pub fn is_allowed_os(&self, name: &str) -> bool {
        self.options.operating_systems.iter().any(|os| os == name)
    }
}

fn gpu(display_name: &str, short_name: &str) -> GpuInfo {
    GpuInfo {
        display_name: display_name.to_string(),
        short_name: short_name.to_string(),
    }
}

fn os(display_name: &str, features: &str, min_storage_gb: u32, for_ai: bool) -> OsTemplate {
    OsTemplate {
        display_name: display_name.to_string(),
        features: features.to_string(),
        min_storage_gb: Some(min_storage_gb),
        for_ai,
    }
}

fn h100_preset(gpu_count: u32, ram: u32, vcpu: u32, storage: u32) -> DeployConfiguration {
    let nvswitch = gpu_count == 8;
    DeployConfiguration {
        gpu_count,
        gpu_model: "h100-sxm5-80gb".to_string(),
        ram,
        vcpu,
        storage,
        nvlink: nvswitch,
        bandwidth: if nvswitch { 100 } else { 10 },
    }
}

fn builtin_gpus() -> BTreeMap<String, GpuInfo> {
    [
        ("a100-sxm4-80gb", gpu("A100 80GB SXM4", "A100 SXM4")),
        ("a100-pcie-80gb", gpu("A100 80GB PCIE", "A100")),
        ("a100-pcie-40gb", gpu("A100 40GB PCIE", "A100")),
        ("a100-nvlink-40gb", gpu("A100 40GB NVLink", "A100 NVLink")),
        ("l40s-pcie-48gb", gpu("L40S 48GB PCIE", "L40S")),
        ("l40-pcie-48gb", gpu("L40 48GB PCIE", "L40")),
        ("v100-sxm2-16gb", gpu("V100 16GB SXM2", "V100 SXM2")),
        ("v100-nvlink-16gb", gpu("V100 16GB NVLink", "V100 NVLink")),
        ("rtx6000ada-pcie-48gb", gpu("RTX 6000 ADA 48GB", "RTX 6000 Ada")),
        ("rtx5000ada-pcie-32gb", gpu("RTX 5000 ADA 32GB", "RTX 5000 Ada")),
        ("rtx4500ada-pcie-24gb", gpu("RTX 4500 ADA 24GB", "RTX 4500 Ada")),
        ("rtx4000ada-pcie-20gb", gpu("RTX 4000 ADA 20GB", "RTX 4000 Ada")),
        (
            "rtx4000sffada-pcie-20gb",
            gpu("RTX 4000 SFF ADA 20GB", "RTX 4000 SFF Ada"),
        ),
        ("rtxa6000-pcie-48gb", gpu("RTX A6000 48GB", "RTX A6000")),
        ("rtxa5000-pcie-24gb", gpu("RTX A5000 24GB", "RTX A5000")),
        ("rtxa4000-pcie-16gb", gpu("RTX A4000 16GB", "RTX A4000")),
        (
            "geforcertx4090-pcie-24gb",
            gpu("GeForce RTX 4090 24GB", "RTX 4090"),
        ),
        (
            "geforcertx3090-pcie-24gb",
            gpu("GeForce RTX 3090 24GB", "RTX 3090"),
        ),
        (
            "geforcertx3080ti-pcie-12gb",
            gpu("GeForce RTX 3080 Ti 12GB", "RTX 3080ti"),
        ),
        (
            "geforcertx3080-pcie-10gb",
            gpu("GeForce RTX 3080 10GB", "RTX 3080"),
        ),
        (
            "geforcertx3070ti-pcie-8gb",
            gpu("GeForce RTX 3070 Ti 8GB", "RTX 3070ti"),
        ),
        (
            "geforcertx3060-pcie-12gb",
            gpu("GeForce RTX 3060 12GB", "RTX 3060"),
        ),
        ("quadrortx4000-pcie-8gb", gpu("Quadro RTX 4000 8GB", "Quadro RTX 4000")),
        (
            "quadrortx5000-pcie-16gb",
            gpu("Quadro RTX 5000 16GB", "Quadro RTX 5000"),
        ),
        ("h100-sxm5-80gb", gpu("H100 SXM5 80GB", "H100 SXM5")),
    ]
    .into_iter()
    .map(|(id, info)| (id.to_string(), info))
    .collect()
}

fn builtin_operating_systems() -> BTreeMap<String, OsTemplate> {
    [
        (
            "TensorML 20 TensorFlow",
            os(
                "TensorML 20.04 LTS TensorFlow",
                "Docker, Jupyter, TensorFlow, Keras, CUDA",
                40,
                true,
            ),
        ),
        (
            "TensorML 20 PyTorch",
            os(
                "TensorML 20.04 LTS PyTorch",
                "Docker, Jupyter, PyTorch, CUDA",
                40,
                true,
            ),
        ),
        (
            "TensorML 20 Everything",
            os(
                "TensorML 20.04 LTS Everything",
                "Docker, Jupyter, RAPIDS, TensorFlow, PyTorch, Keras, fastai, CUDA",
                60,
                true,
            ),
        ),
        (
            "TensorML 20 RAPIDS",
            os("TensorML 20.04 LTS RAPIDS", "Docker, Jupyter, RAPIDS", 40, false),
        ),
        (
            "Ubuntu 22.04 LTS",
            os("Ubuntu 22.04 LTS", "Docker", 20, false),
        ),
        (
            "Ubuntu 20.04 LTS",
            os("Ubuntu 20.04 LTS", "Docker", 20, false),
        ),
        (
            "Windows 10",
            os(
                "Windows 10",
                "NVIDIA drivers preinstalled. Bring Your Own License.",
                90,
                false,
            ),
        ),
    ]
    .into_iter()
    .map(|(name, template)| (name.to_string(), template))
    .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            gpus: builtin_gpus(),
            operating_systems: builtin_operating_systems(),
            options: SpecOptions {
                gpus: strings(&[
                    "h100-sxm5-80gb",
                    "a100-pcie-80gb",
                    "a100-pcie-40gb",
                    "a100-nvlink-40gb",
                    "geforcertx4090-pcie-24gb",
                    "geforcertx3090-pcie-24gb",
                    "geforcertx3070ti-pcie-8gb",
                    "geforcertx3060-pcie-12gb",
                ]),
                operating_systems: strings(&[
                    "Ubuntu 20.04 LTS",
                    "Ubuntu 22.04 LTS",
                    "TensorML 20 Everything",
                    "TensorML 20 PyTorch",
                    "TensorML 20 TensorFlow",
                    "Windows 10",
                ]),
                gpu_counts: (1..=8).collect(),
                ram_gb: vec![
                    4, 6, 8, 10, 12, 16, 20, 24, 30, 32, 48, 61, 64, 100, 112, 120, 128, 160, 240,
                    256, 300, 366, 384, 492, 640, 768, 896, 940, 1420,
                ],
                vcpu_counts: vec![
                    2, 4, 6, 8, 10, 12, 14, 16, 20, 24, 28, 32, 36, 40, 44, 46, 60, 94, 104, 128,
                    254,
                ],
                storage_gb: vec![
                    20, 30, 40, 50, 60, 70, 80, 90, 100, 150, 200, 300, 400, 500, 600, 700, 800,
                    900, 1000, 1200, 1400, 1600, 1800, 2000, 2500, 3000, 3500, 4000, 4500, 5000,
                    5500, 6000, 6500, 7000, 7500, 8000, 8500, 9000, 9500, 10000,
                ],
            },
            default_spec: DeploySpec {
                gpu_model: "geforcertx4090-pcie-24gb".to_string(),
                gpu_count: 1,
                ram: 4,
                vcpu: 2,
                storage: 20,
            },
            default_ports: vec![
                PortForward::new("20004", "22"),
                PortForward::new("20018", "3389"),
                PortForward::new("20022", "8888"),
            ],
            presets: vec![
                h100_preset(1, 62, 12, 600),
                h100_preset(1, 124, 24, 1200),
                h100_preset(2, 124, 24, 1200),
                h100_preset(2, 248, 48, 2400),
                h100_preset(4, 248, 48, 2400),
                h100_preset(4, 496, 96, 4800),
                h100_preset(8, 496, 96, 4800),
                h100_preset(8, 906, 208, 11680),
            ],
        }
    }
}
