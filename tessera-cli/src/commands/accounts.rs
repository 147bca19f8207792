//! Accounts commands - list, show, and delete enrolled accounts

use anyhow::{bail, Result};
use clap::Subcommand;
use dialoguer::Confirm;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// List all accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one account with its devices
    Show {
        /// Username to look up
        username: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one account
    Delete {
        /// Username to delete
        username: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Delete every account
    DeleteAll {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::List { json } => list(json).await,
        AccountCommands::Show { username, json } => show(&username, json).await,
        AccountCommands::Delete { username, force } => delete(&username, force).await,
        AccountCommands::DeleteAll { force } => delete_all(force).await,
    }
}

async fn list(json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let accounts = ctx.registry.get_accounts().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts registered");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Username", "Devices"]);
    for account in &accounts {
        table.add_row(vec![
            account.username.clone(),
            account.devices.len().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn show(username: &str, json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let account = match ctx.registry.get_account(username).await? {
        Some(account) => account,
        None => bail!("No account found for '{username}'"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Public ID", "Registered"]);
    for device in &account.devices {
        table.add_row(vec![
            device.id.to_string(),
            device.name.clone(),
            device.public_id.clone(),
            device.registered_at.to_rfc3339(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn delete(username: &str, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete account '{username}' and all its devices?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    let ctx = get_context().await?;
    if ctx.registry.delete_account(username).await? {
        output::success(&format!("Deleted account '{username}'"));
    } else {
        output::warning(&format!("No account found for '{username}'"));
    }
    Ok(())
}

async fn delete_all(force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Delete ALL accounts and devices?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    let ctx = get_context().await?;
    let count = ctx.registry.delete_all_accounts().await?;
    output::success(&format!("Deleted {count} account(s)"));
    Ok(())
}
