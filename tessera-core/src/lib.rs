//! Tessera Core - credential registry for the Tessera SSO server
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, Device, RegisteredService)
//! - **ports**: Trait definitions for external dependencies (CredentialStore, Cipher, ...)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, AES-GCM, modhex OTP, ...)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::aes::AesGcmCipher;
use adapters::duckdb::DuckDbStore;
use adapters::json_catalog::JsonServiceCatalog;
use adapters::otp::ModhexAccountValidator;
use config::Config;
use domain::result::Result;
use ports::{Cipher, PassthroughCipher};
use services::{CatalogInitializer, CredentialRegistry, KeyService, StatusService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Account, Device, EncryptionStatus, RegisteredService};
pub use services::RegistrationRequest;

/// Main context for Tessera operations
///
/// This is the primary entry point for all business logic. It holds the
/// registry database, configuration, and all services.
pub struct TesseraContext {
    pub config: Config,
    pub store: Arc<DuckDbStore>,
    pub registry: CredentialRegistry,
    pub status_service: StatusService,
    pub catalog_initializer: CatalogInitializer,
    pub key_service: KeyService,
}

impl TesseraContext {
    /// Create a new Tessera context.
    ///
    /// `cipher_key` is the hex-encoded 32-byte field-encryption key from
    /// the key service; without one, device public ids are stored as-is
    /// (passthrough cipher), which is only appropriate for tests and
    /// throwaway environments.
    pub fn new(tessera_dir: &Path, cipher_key: Option<&str>) -> Result<Self> {
        let config = Config::load(tessera_dir)?;

        let db_path = tessera_dir.join("tessera.duckdb");
        let store = Arc::new(DuckDbStore::new(&db_path)?);
        store.ensure_schema()?;

        let cipher: Arc<dyn Cipher> = match cipher_key {
            Some(key) => Arc::new(AesGcmCipher::from_hex_key(key)?),
            None => Arc::new(PassthroughCipher),
        };

        let validator = Arc::new(ModhexAccountValidator::new());
        let seed = Arc::new(JsonServiceCatalog::new(config.services_dir.clone()));

        let registry = CredentialRegistry::new(store.clone(), cipher, validator);
        let status_service = StatusService::new(store.clone(), store.clone());
        let catalog_initializer =
            CatalogInitializer::new(seed, store.clone(), config.init_services_from_json);
        let key_service = KeyService::new(tessera_dir.to_path_buf());

        Ok(Self {
            config,
            store,
            registry,
            status_service,
            catalog_initializer,
            key_service,
        })
    }
}
