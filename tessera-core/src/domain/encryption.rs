//! Encryption domain models

use serde::{Deserialize, Serialize};

/// Default Argon2id parameters
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_MEMORY_COST: u32 = 65536; // 64 MiB
pub const DEFAULT_PARALLELISM: u32 = 4;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Argon2id parameters for key derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Params {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// Cipher key configuration stored in encryption.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionMetadata {
    pub encrypted: bool,
    /// Base64-encoded random salt
    pub salt: String,
    pub algorithm: String,
    pub version: u32,
    pub argon2_params: Argon2Params,
}

impl EncryptionMetadata {
    /// Create metadata for a newly initialized cipher key
    pub fn new_encrypted(salt: String) -> Self {
        Self {
            encrypted: true,
            salt,
            algorithm: "argon2id+aes-256-gcm".to_string(),
            version: 1,
            argon2_params: Argon2Params::default(),
        }
    }
}

/// Status of device-identifier encryption for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionStatus {
    pub encrypted: bool,
    pub algorithm: Option<String>,
    pub version: Option<u32>,
}

impl EncryptionStatus {
    pub fn unencrypted() -> Self {
        Self {
            encrypted: false,
            algorithm: None,
            version: None,
        }
    }

    pub fn from_metadata(meta: &EncryptionMetadata) -> Self {
        Self {
            encrypted: meta.encrypted,
            algorithm: Some(meta.algorithm.clone()),
            version: Some(meta.version),
        }
    }
}
