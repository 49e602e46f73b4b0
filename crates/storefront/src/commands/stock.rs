use super::{api_client, SpecArgs};
use crate::config::Config;
use crate::services::inventory::{preset_query, query_for, InventoryWatcher};
use anyhow::{Context, Result};
use clap::Args;
use deploy::locations::{generate_locations, RankedLocations};
use deploy::presets::{display_presets, match_presets, SafetyReserve};
use deploy::selection::default_host;
use log::info;
use shared::catalog::Catalog;
use shared::models::location::LocationInfo;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    pub(crate) spec: SpecArgs,

    /// Host to keep selected across refreshes
    #[arg(long)]
    pub(crate) hostnode: Option<String>,

    /// Refresh interval in seconds (overrides config)
    #[arg(long)]
    pub(crate) interval: Option<u64>,
}

fn print_location(rank: usize, location: &LocationInfo, catalog: &Catalog) {
    let host = default_host(location)
        .map(|h| h.id.as_str())
        .unwrap_or("-");
    let reserved = if location.has_reserved_host() {
        " [reserved]"
    } else {
        ""
    };
    println!(
        "{rank:>3}. {} | {} | ${:.3}/hr | {} ({} GPUs) | {} | host {host}{reserved}",
        location.location,
        catalog.display_name(&location.gpu_type),
        location.price,
        location.availability,
        location.stock,
        location.cpu_type,
    );
}

fn print_ranked(ranked: &RankedLocations, catalog: &Catalog) {
    if ranked.locations.is_empty() {
        println!("No locations have the requested configuration in stock");
    }
    for (i, location) in ranked.locations.iter().enumerate() {
        print_location(i + 1, location, catalog);
    }
    if !ranked.suggested.is_empty() {
        println!("\nOther GPUs that fit this configuration:");
        for (i, location) in ranked.suggested.iter().enumerate() {
            print_location(i + 1, location, catalog);
        }
    }
}

pub(crate) async fn handle_locations(args: SpecArgs, config: &Config) -> Result<()> {
    let catalog = config.catalog()?;
    let client = api_client(config)?;
    let spec = args.to_spec(&catalog);

    let inventory = client
        .get_hostnodes(&query_for(&spec, &catalog))
        .await
        .context("Failed to fetch hostnodes")?;
    info!("Ranking {} hostnodes for {spec}", inventory.len());

    print_ranked(&generate_locations(&spec, &inventory, &catalog), &catalog);
    Ok(())
}

pub(crate) async fn handle_presets(config: &Config) -> Result<()> {
    let catalog = config.catalog()?;
    let client = api_client(config)?;

    let inventory = client
        .get_hostnodes(&preset_query(&catalog))
        .await
        .context("Failed to fetch hostnodes")?;
    let matches = match_presets(&catalog.presets, &inventory, &SafetyReserve::default());
    let presets = display_presets(&matches, &catalog);

    if presets.is_empty() {
        println!("All configurations are currently out of stock");
        return Ok(());
    }
    for preset in presets {
        let cfg = &preset.configuration;
        let nvlink = if cfg.nvlink { ", NVLink" } else { "" };
        println!(
            "#{} {}x {} | {} vCPUs | {} GB RAM | {} GB storage | {} Gbps{nvlink} | ${:.3}/hr | host {}",
            preset.index,
            cfg.gpu_count,
            preset.gpu_name,
            cfg.vcpu,
            cfg.ram,
            cfg.storage,
            cfg.bandwidth,
            preset.price,
            preset.hostnode,
        );
    }
    Ok(())
}

pub(crate) async fn handle_watch(args: WatchArgs, config: &Config) -> Result<()> {
    let catalog = Arc::new(config.catalog()?);
    let client = Arc::new(api_client(config)?);
    let spec = args.spec.to_spec(&catalog);
    let interval = args.interval.unwrap_or(config.refresh_interval_secs);

    let cancellation_token = CancellationToken::new();
    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, stopping");
            signal_token.cancel();
        }
    });

    let mut watcher = InventoryWatcher::new(client, Arc::clone(&catalog), spec, cancellation_token)
        .with_selection(args.hostnode);
    watcher
        .run(interval, |ranked, selected| {
            println!("---");
            if let Some(host) = selected {
                println!("Selected host: {host}");
            }
            print_ranked(ranked, &catalog);
        })
        .await
}
