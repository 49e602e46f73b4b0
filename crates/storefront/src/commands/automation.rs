use super::api_client;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Subcommand;
use log::info;
use shared::models::automation::{AutomationAction, NewAutomation};

#[derive(Subcommand, Debug)]
pub(crate) enum AutomationCommands {
    /// List balance automations
    List,
    /// Email an address when the balance drops below a threshold
    AddEmail {
        /// Balance threshold in USD
        #[arg(long)]
        threshold: String,

        #[arg(long)]
        email: String,
    },
    /// Charge a saved card when the balance drops below a threshold
    AddCharge {
        /// Balance threshold in USD
        #[arg(long)]
        threshold: String,

        /// Amount to charge in USD
        #[arg(long)]
        amount: String,

        /// Payment method id, see `account`
        #[arg(long)]
        card: String,
    },
    /// Delete an automation
    Delete {
        /// Automation UUID
        uuid: String,
    },
}

pub(crate) async fn handle_command(command: AutomationCommands, config: &Config) -> Result<()> {
    let client = api_client(config)?;
    match command {
        AutomationCommands::List => {
            let automations = client
                .list_automations()
                .await
                .context("Failed to fetch automations")?;
            if automations.is_empty() {
                println!("No automations");
            }
            for automation in automations {
                let target = match automation.action {
                    AutomationAction::Email => automation.message_target.clone(),
                    AutomationAction::Charge => format!(
                        "${:.2} to {}",
                        automation.charge_amount, automation.payment_method
                    ),
                };
                println!(
                    "{} | below ${:.2} | {} {target}",
                    automation.uuid, automation.threshold, automation.action
                );
            }
        }
        AutomationCommands::AddEmail { threshold, email } => {
            client
                .add_automation(&NewAutomation::Email { threshold, email })
                .await
                .context("Failed to add automation")?;
            info!("Email automation added");
        }
        AutomationCommands::AddCharge {
            threshold,
            amount,
            card,
        } => {
            client
                .add_automation(&NewAutomation::Charge {
                    threshold,
                    charge_amount: amount,
                    card,
                })
                .await
                .context("Failed to add automation")?;
            info!("Charge automation added");
        }
        AutomationCommands::Delete { uuid } => {
            client
                .delete_automation(&uuid)
                .await
                .context("Failed to delete automation")?;
            info!("Deleted automation {uuid}");
        }
    }
    Ok(())
}
