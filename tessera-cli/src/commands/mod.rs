//! CLI command implementations

pub mod accounts;
pub mod encrypt;
pub mod register;
pub mod services;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tessera_core::services::KeyService;
use tessera_core::TesseraContext;

/// Get the tessera directory from environment or default
pub fn get_tessera_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TESSERA_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".tessera")
    }
}

/// Get or create the tessera context.
///
/// Cipher key resolution: TESSERA_KEY (pre-derived hex key) takes
/// precedence over TESSERA_PASSWORD (derived via the key service). With
/// neither set, device ids are stored without encryption - the commands
/// warn about that where it matters.
pub async fn get_context() -> Result<TesseraContext> {
    let tessera_dir = get_tessera_dir();

    std::fs::create_dir_all(&tessera_dir)
        .with_context(|| format!("Failed to create tessera directory: {tessera_dir:?}"))?;

    let cipher_key = if let Ok(key) = std::env::var("TESSERA_KEY") {
        Some(key)
    } else if let Ok(password) = std::env::var("TESSERA_PASSWORD") {
        let key_service = KeyService::new(tessera_dir.clone());
        if key_service.is_initialized()? {
            Some(
                key_service
                    .derive_for_cipher(&password)
                    .context("Failed to derive cipher key from password")?,
            )
        } else {
            None
        }
    } else {
        None
    };

    TesseraContext::new(&tessera_dir, cipher_key.as_deref())
        .context("Failed to initialize tessera context")
}
