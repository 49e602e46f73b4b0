use super::api_client;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Subcommand;
use log::info;

#[derive(Subcommand, Debug)]
pub(crate) enum VmCommands {
    /// List virtual machines
    List,
    /// Start a stopped virtual machine
    Start {
        /// Server UUID
        server: String,
    },
    /// Stop a running virtual machine
    Stop {
        /// Server UUID
        server: String,

        /// Release the GPUs; they may be rented out before the VM starts again
        #[arg(long)]
        release_gpu: bool,
    },
    /// Delete a virtual machine
    Delete {
        /// Server UUID
        server: String,
    },
}

pub(crate) async fn handle_command(command: VmCommands, config: &Config) -> Result<()> {
    let client = api_client(config)?;
    match command {
        VmCommands::List => {
            let vms = client
                .list_vms()
                .await
                .context("Failed to list virtual machines")?;
            if vms.is_empty() {
                println!("No virtual machines");
            }
            for (uuid, vm) in &vms {
                let gpu = vm.specs.gpu.gpu_type.as_deref().unwrap_or("no GPU");
                println!(
                    "{uuid} | {} | {} | {}x {gpu} | {} vCPUs | {} GB RAM | {} GB | {} | ${}/hr",
                    vm.name,
                    vm.status,
                    vm.specs.gpu.amount,
                    vm.specs.vcpus,
                    vm.specs.ram,
                    vm.specs.storage,
                    vm.reachable_ip().unwrap_or("-"),
                    vm.total_price,
                );
            }
        }
        VmCommands::Start { server } => {
            client.start_vm(&server).await.context("Failed to start VM")?;
            info!("Started {server}");
        }
        VmCommands::Stop {
            server,
            release_gpu,
        } => {
            client
                .stop_vm(&server, release_gpu)
                .await
                .context("Failed to stop VM")?;
            info!("Stopped {server}");
        }
        VmCommands::Delete { server } => {
            client
                .delete_vm(&server)
                .await
                .context("Failed to delete VM")?;
            info!("Deleted {server}");
        }
    }
    Ok(())
}
