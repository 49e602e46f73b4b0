use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

mod api;
mod commands;
mod config;
mod services;

use commands::{AutomationCommands, DeployArgs, SpecArgs, VmCommands, WatchArgs};
use config::Config;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "GPU virtual machine storefront")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// Environment file path
    #[arg(long, global = true, default_value = ".env")]
    env_file: String,

    /// Provisioning API base URL (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// API token (overrides config)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Reseller subdomain (overrides config)
    #[arg(long, global = true)]
    subdomain: Option<String>,

    /// Log level; RUST_LOG is used when unset
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank locations that can host a configuration
    Locations {
        #[command(flatten)]
        spec: SpecArgs,
    },
    /// List preset configurations currently in stock
    Presets,
    /// Check a deploy request without sending it
    Validate(DeployArgs),
    /// Validate and deploy a virtual machine
    Deploy(DeployArgs),
    /// Keep re-ranking locations as stock changes
    Watch(WatchArgs),
    /// Virtual machine operations
    Vm {
        #[command(subcommand)]
        command: VmCommands,
    },
    /// Balance automations
    Automation {
        #[command(subcommand)]
        command: AutomationCommands,
    },
    /// Account balance and payment methods
    Account,
}

fn init_logging(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level.unwrap_or(LevelFilter::Info))
        .format_timestamp(None);
    if level.is_none() {
        builder.parse_default_env();
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = Config::load(cli.config.as_deref(), &cli.env_file)?
        .with_api_base_url(cli.api_url)
        .with_token(cli.token)
        .with_subdomain(cli.subdomain);

    match cli.command {
        Commands::Locations { spec } => commands::stock::handle_locations(spec, &config).await,
        Commands::Presets => commands::stock::handle_presets(&config).await,
        Commands::Validate(args) => commands::deploy::handle_validate(args, &config).await,
        Commands::Deploy(args) => commands::deploy::handle_deploy(args, &config).await,
        Commands::Watch(args) => commands::stock::handle_watch(args, &config).await,
        Commands::Vm { command } => commands::vm::handle_command(command, &config).await,
        Commands::Automation { command } => {
            commands::automation::handle_command(command, &config).await
        }
        Commands::Account => commands::account::handle_account(&config).await,
    }
}
