use crate::api::ApiClient;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use shared::catalog::Catalog;
use shared::models::spec::DeploySpec;

pub(crate) mod account;
pub(crate) mod automation;
pub(crate) mod deploy;
pub(crate) mod stock;
pub(crate) mod vm;

pub(crate) use automation::AutomationCommands;
pub(crate) use deploy::DeployArgs;
pub(crate) use stock::WatchArgs;
pub(crate) use vm::VmCommands;

/// Hardware selection shared by the stock and deploy commands. Unset values
/// come from the catalog's default spec.
#[derive(Args, Debug, Clone)]
pub(crate) struct SpecArgs {
    /// GPU model id, e.g. h100-sxm5-80gb
    #[arg(long)]
    pub(crate) gpu_model: Option<String>,

    #[arg(long)]
    pub(crate) gpu_count: Option<u32>,

    /// RAM in GB
    #[arg(long)]
    pub(crate) ram: Option<u32>,

    #[arg(long)]
    pub(crate) vcpu: Option<u32>,

    /// Storage in GB
    #[arg(long)]
    pub(crate) storage: Option<u32>,
}

impl SpecArgs {
    pub(crate) fn to_spec(&self, catalog: &Catalog) -> DeploySpec {
        let defaults = &catalog.default_spec;
        DeploySpec {
            gpu_model: self
                .gpu_model
                .clone()
                .unwrap_or_else(|| defaults.gpu_model.clone()),
            gpu_count: self.gpu_count.unwrap_or(defaults.gpu_count),
            ram: self.ram.unwrap_or(defaults.ram),
            vcpu: self.vcpu.unwrap_or(defaults.vcpu),
            storage: self.storage.unwrap_or(defaults.storage),
        }
    }
}

pub(crate) fn api_client(config: &Config) -> Result<ApiClient> {
    let client = ApiClient::new(config.get_api_base_url()?, config.get_token()?)
        .context("Failed to create API client")?;
    Ok(client
        .with_subdomain(config.subdomain.clone())
        .with_domain(config.domain.clone()))
}
