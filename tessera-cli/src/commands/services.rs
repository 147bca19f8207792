//! Services commands - service catalog administration

use anyhow::Result;
use clap::Subcommand;
use tessera_core::ports::ServiceCatalog;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum ServiceCommands {
    /// List registered services
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Seed the catalog from JSON definitions in the services directory
    Init,
}

pub async fn run(command: ServiceCommands) -> Result<()> {
    match command {
        ServiceCommands::List { json } => list(json).await,
        ServiceCommands::Init => init().await,
    }
}

async fn list(json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let services = ctx.store.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&services)?);
        return Ok(());
    }

    if services.is_empty() {
        println!("No services registered");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Service ID"]);
    for service in &services {
        table.add_row(vec![
            service.id.to_string(),
            service.name.clone(),
            service.service_id.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn init() -> Result<()> {
    let ctx = get_context().await?;
    let result = ctx.catalog_initializer.initialize().await?;
    output::success(&format!(
        "Catalog initialized: {} loaded, {} skipped, {} total",
        result.loaded, result.skipped, result.total
    ));
    Ok(())
}
