//! Key service - cipher key material management
//!
//! Derives the AES-256 field-encryption key from a password with Argon2id.
//! The random salt and derivation parameters live in `encryption.json`
//! next to the registry database; the key itself is never persisted.

use std::fs;
use std::path::PathBuf;

use base64::Engine;
use rand::RngCore;
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, EncryptionMetadata, EncryptionStatus};

/// Manages cipher key derivation and the encryption.json sidecar
pub struct KeyService {
    tessera_dir: PathBuf,
}

impl KeyService {
    pub fn new(tessera_dir: PathBuf) -> Self {
        Self { tessera_dir }
    }

    fn encryption_file(&self) -> PathBuf {
        self.tessera_dir.join("encryption.json")
    }

    /// Derive an encryption key from a password using Argon2id
    fn derive_key(&self, password: &str, salt: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
        let argon2_params = argon2::Params::new(
            params.memory_cost,
            params.time_cost,
            params.parallelism,
            Some(params.hash_len as usize),
        )
        .map_err(|e| Error::encryption(format!("failed to create argon2 params: {e:?}")))?;

        let argon2 = argon2::Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2_params,
        );

        let mut key = vec![0u8; params.hash_len as usize];
        argon2
            .hash_password_into(password.as_bytes(), salt, &mut key)
            .map_err(|e| Error::encryption(format!("failed to derive key: {e:?}")))?;

        Ok(key)
    }

    /// Get encryption status for display
    pub fn get_status(&self) -> Result<EncryptionStatus> {
        let enc_file = self.encryption_file();
        if !enc_file.exists() {
            return Ok(EncryptionStatus::unencrypted());
        }

        let content = fs::read_to_string(&enc_file)?;
        let metadata: EncryptionMetadata = serde_json::from_str(&content)?;
        Ok(EncryptionStatus::from_metadata(&metadata))
    }

    /// Whether a cipher key has been initialized
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.get_status()?.encrypted)
    }

    /// Initialize key material: generate a salt, persist the metadata, and
    /// return the derived key as hex.
    pub fn initialize(&self, password: &str) -> Result<String> {
        if self.is_initialized()? {
            return Err(Error::encryption("cipher key is already initialized"));
        }

        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt_b64 = base64::engine::general_purpose::STANDARD.encode(salt);

        let metadata = EncryptionMetadata::new_encrypted(salt_b64);
        let key = self.derive_key(password, &salt, &metadata.argon2_params)?;

        fs::create_dir_all(&self.tessera_dir)?;
        let content = serde_json::to_string_pretty(&metadata)?;
        fs::write(self.encryption_file(), content)?;
        debug!(path = %self.encryption_file().display(), "Cipher key material initialized");

        Ok(hex::encode(key))
    }

    /// Derive the cipher key for an already-initialized deployment,
    /// returned as hex.
    pub fn derive_for_cipher(&self, password: &str) -> Result<String> {
        let enc_file = self.encryption_file();
        if !enc_file.exists() {
            return Err(Error::encryption("cipher key is not initialized"));
        }

        let content = fs::read_to_string(&enc_file)?;
        let metadata: EncryptionMetadata = serde_json::from_str(&content)?;
        if !metadata.encrypted {
            return Err(Error::encryption("cipher key is not initialized"));
        }

        let salt = base64::engine::general_purpose::STANDARD
            .decode(&metadata.salt)
            .map_err(|_| Error::encryption("invalid salt in encryption metadata"))?;

        let key = self.derive_key(password, &salt, &metadata.argon2_params)?;
        Ok(hex::encode(key))
    }
}
