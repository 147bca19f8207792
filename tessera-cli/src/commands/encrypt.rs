//! Encrypt commands - cipher key management

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Password;
use tessera_core::services::KeyService;

use super::get_tessera_dir;
use crate::output;

#[derive(Subcommand)]
pub enum EncryptCommands {
    /// Initialize device-identifier encryption with a password
    Init,

    /// Show encryption status
    Status,
}

pub async fn run(command: EncryptCommands) -> Result<()> {
    let key_service = KeyService::new(get_tessera_dir());

    match command {
        EncryptCommands::Init => {
            let password = Password::new()
                .with_prompt("Encryption password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?;

            key_service.initialize(&password)?;
            output::success("Encryption initialized");
            println!(
                "New registrations will be encrypted. Set TESSERA_PASSWORD (or TESSERA_KEY) \
                 for commands that read or write device identifiers."
            );
        }
        EncryptCommands::Status => {
            let status = key_service.get_status()?;
            if status.encrypted {
                output::success(&format!(
                    "Encryption enabled ({})",
                    status.algorithm.as_deref().unwrap_or("unknown")
                ));
            } else {
                output::warning("Encryption not initialized");
            }
        }
    }
    Ok(())
}
