use super::api_client;
use crate::config::Config;
use anyhow::{Context, Result};

pub(crate) async fn handle_account(config: &Config) -> Result<()> {
    let client = api_client(config)?;

    let user = client
        .user_info()
        .await
        .context("Failed to fetch account")?;
    println!("Email:        {}", user.email);
    if !user.organization_name.is_empty() {
        println!("Organization: {}", user.organization_name);
    }
    println!("Balance:      ${:.2}", user.balance);

    let methods = client
        .payment_methods()
        .await
        .context("Failed to fetch payment methods")?;
    for method in methods {
        println!("Card:         **** {} ({})", method.last4, method.id);
    }
    Ok(())
}
