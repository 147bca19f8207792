//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the CredentialStore and ServiceCatalog ports
//! - AES-256-GCM for the Cipher port
//! - Modhex OTP shape checking for the AccountValidator port
//! - JSON definition files for the seed ServiceCatalog
//! - In-memory maps for tests and demos

pub mod aes;
pub mod duckdb;
pub mod json_catalog;
pub mod memory;
pub mod otp;
