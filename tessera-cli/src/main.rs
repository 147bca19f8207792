//! Tessera CLI - credential registry administration

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{accounts, encrypt, register, services, status};

/// Tessera - SSO credential registry administration
#[derive(Parser)]
#[command(name = "tsr", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show registry status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a hardware token for a user
    Register {
        /// Username to enroll the device for
        username: String,
        /// One-time token emitted by the device
        token: String,
        /// Display name for the device
        #[arg(long, default_value = "hardware-token")]
        name: String,
    },

    /// Manage enrolled accounts
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountCommands,
    },

    /// Manage the service catalog
    Services {
        #[command(subcommand)]
        command: services::ServiceCommands,
    },

    /// Manage device-identifier encryption
    Encrypt {
        #[command(subcommand)]
        command: encrypt::EncryptCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Status { json } => status::run(json).await,
        Commands::Register {
            username,
            token,
            name,
        } => register::run(&username, &token, &name).await,
        Commands::Accounts { command } => accounts::run(command).await,
        Commands::Services { command } => services::run(command).await,
        Commands::Encrypt { command } => encrypt::run(command).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {e:#}"));
            ExitCode::FAILURE
        }
    }
}
