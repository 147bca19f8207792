//! Status command - registry summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let encryption = ctx.key_service.get_status()?;
    let status = ctx.status_service.get_status(encryption).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Credential Registry Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Devices", &status.total_devices.to_string()]);
    table.add_row(vec!["Services", &status.total_services.to_string()]);
    table.add_row(vec![
        "Encryption",
        if status.encryption.encrypted {
            status.encryption.algorithm.as_deref().unwrap_or("enabled")
        } else {
            "disabled"
        },
    ]);
    println!("{table}");

    if !status.encryption.encrypted {
        println!();
        output::warning("Device identifiers are stored unencrypted. Run `tsr encrypt init`.");
    }

    Ok(())
}
