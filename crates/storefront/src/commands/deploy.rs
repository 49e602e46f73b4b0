use super::{api_client, SpecArgs};
use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::services::deployer::Deployer;
use crate::services::inventory::query_for;
use anyhow::{bail, Context, Result};
use clap::Args;
use deploy::locations::generate_locations;
use deploy::selection::default_host;
use shared::catalog::Catalog;
use shared::models::deploy::{DeployRequest, PortForward};
use std::path::PathBuf;

fn parse_port_forward(raw: &str) -> Result<PortForward, String> {
    let (from, to) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected EXTERNAL:INTERNAL, got {raw}"))?;
    Ok(PortForward::new(from.trim(), to.trim()))
}

#[derive(Args, Debug)]
pub(crate) struct DeployArgs {
    #[command(flatten)]
    pub(crate) spec: SpecArgs,

    /// Host to deploy on; defaults to the best ranked location
    #[arg(long)]
    pub(crate) hostnode: Option<String>,

    /// Operating system template
    #[arg(long, default_value = "Ubuntu 22.04 LTS")]
    pub(crate) os: String,

    /// Server name
    #[arg(short = 'n', long)]
    pub(crate) name: String,

    /// Administrator password
    #[arg(long, env = "STOREFRONT_ADMIN_PASSWORD")]
    pub(crate) password: Option<String>,

    /// Public SSH key file
    #[arg(long)]
    pub(crate) ssh_key_file: Option<PathBuf>,

    /// Port forward as EXTERNAL:INTERNAL, repeatable; defaults to the catalog's ports
    #[arg(short = 'p', long = "port", value_parser = parse_port_forward)]
    pub(crate) ports: Vec<PortForward>,

    /// Cloud-init script file
    #[arg(long)]
    pub(crate) cloudinit: Option<PathBuf>,
}

fn read_optional(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|path| {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    })
    .transpose()
}

async fn build_request(
    args: DeployArgs,
    client: &ApiClient,
    catalog: &Catalog,
) -> Result<DeployRequest> {
    let spec = args.spec.to_spec(catalog);

    let hostnode = match args.hostnode {
        Some(host) => host,
        None => {
            let inventory = client
                .get_hostnodes(&query_for(&spec, catalog))
                .await
                .context("Failed to fetch hostnodes")?;
            let ranked = generate_locations(&spec, &inventory, catalog);
            ranked
                .locations
                .first()
                .and_then(default_host)
                .map(|host| host.id.clone())
                .ok_or_else(|| anyhow::anyhow!("No location has {spec} in stock"))?
        }
    };

    let port_forwards = if args.ports.is_empty() {
        catalog.default_ports.clone()
    } else {
        args.ports
    };

    Ok(DeployRequest {
        specs: spec,
        hostnode,
        os: args.os,
        admin_password: args.password,
        ssh_key: read_optional(args.ssh_key_file.as_ref())?.map(|key| key.trim().to_string()),
        server_name: args.name,
        port_forwards,
        cloudinit_script: read_optional(args.cloudinit.as_ref())?.unwrap_or_default(),
    })
}

pub(crate) async fn handle_validate(args: DeployArgs, config: &Config) -> Result<()> {
    let catalog = config.catalog()?;
    let client = api_client(config)?;
    let request = build_request(args, &client, &catalog).await?;

    let report = Deployer::new(&client, &catalog).check(&request).await?;
    println!("{report}");
    if !report.is_valid() {
        bail!("Request has {} issue(s)", report.len());
    }
    Ok(())
}

pub(crate) async fn handle_deploy(args: DeployArgs, config: &Config) -> Result<()> {
    let catalog = config.catalog()?;
    let client = api_client(config)?;
    let request = build_request(args, &client, &catalog).await?;

    match Deployer::new(&client, &catalog).submit(&request).await {
        Ok(response) => {
            println!("Server:  {}", response.server);
            println!("IP:      {}", response.ip);
            println!(
                "Cost:    ${:.3}/hr (compute ${:.3}, storage ${:.3})",
                response.cost.total_price, response.cost.compute_price, response.cost.storage_price
            );
            for (external, internal) in &response.port_forwards {
                println!("Port:    {external} -> {internal}");
            }
            Ok(())
        }
        Err(ApiError::Rejected(report)) => {
            println!("{report}");
            bail!("Deploy request has {} issue(s), nothing was sent", report.len())
        }
        Err(e) => Err(e).context("Deploy failed"),
    }
}
