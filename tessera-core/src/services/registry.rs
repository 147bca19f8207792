//! Credential registry service - the device enrollment core
//!
//! Owns the encryption-on-write / decryption-on-read policy and the
//! merge-or-insert decision. Holds no state of its own; every operation
//! round-trips to the injected store, so concurrent registry instances
//! (even across processes) coordinate purely through storage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::result::Result;
use crate::domain::{Account, Device};
use crate::ports::{AccountValidator, Cipher, CredentialStore};

/// A request to enroll one hardware token for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub username: String,
    /// Single-use opaque secret presented by the device
    pub token: String,
    pub device_name: String,
}

/// Registry of username -> enrolled device bindings.
///
/// Device public identifiers are encrypted before they reach the store and
/// decrypted on the way back out. A device whose stored ciphertext cannot
/// be decoded with the current key is hidden from read results but left in
/// storage, so it becomes visible again if the key is restored.
pub struct CredentialRegistry {
    store: Arc<dyn CredentialStore>,
    cipher: Arc<dyn Cipher>,
    validator: Arc<dyn AccountValidator>,
}

impl CredentialRegistry {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        cipher: Arc<dyn Cipher>,
        validator: Arc<dyn AccountValidator>,
    ) -> Self {
        Self {
            store,
            cipher,
            validator,
        }
    }

    /// Register a device for a user.
    ///
    /// Returns `Ok(false)` when the validator rejects the (username, token)
    /// pair - an expected, frequent outcome, not an error - in which case
    /// nothing is written. Storage failures after a successful validation
    /// propagate as `Err`.
    pub async fn register_device(&self, request: &RegistrationRequest) -> Result<bool> {
        if request.username.trim().is_empty() {
            debug!("Rejecting registration with empty username");
            return Ok(false);
        }

        if !self
            .validator
            .is_valid(&request.username, &request.token)
            .await
        {
            debug!(username = %request.username, "Validator declined registration token");
            return Ok(false);
        }

        let public_id = match self.validator.token_public_id(&request.token) {
            Some(id) => id,
            None => {
                debug!(username = %request.username, "Token carries no public id");
                return Ok(false);
            }
        };

        // Encrypt before any persistence call; the plaintext identifier
        // must never reach the store.
        let encrypted_id = self.cipher.encode(&public_id)?;
        let device = Device::new(&request.device_name, encrypted_id);

        debug!(
            username = %request.username,
            device_id = device.id,
            "Appending registered device"
        );
        self.store.append_device(&request.username, &device).await?;
        Ok(true)
    }

    /// Get the account for a username with device public ids decrypted.
    ///
    /// `Ok(None)` means no such account; storage failures propagate so
    /// callers can tell "not found" from "unavailable". The returned
    /// account is a detached copy.
    pub async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        let account = self.store.get_account(username).await?;
        Ok(account.map(|a| self.decrypt_account(a)))
    }

    /// Get every account with device public ids decrypted.
    ///
    /// An account whose every device fails to decrypt is still returned,
    /// with an empty device list.
    pub async fn get_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.store.get_accounts().await?;
        Ok(accounts
            .into_iter()
            .map(|a| self.decrypt_account(a))
            .collect())
    }

    /// Delete the account for a username.
    ///
    /// Returns whether an account was removed; deleting a missing account
    /// is a no-op, not an error.
    pub async fn delete_account(&self, username: &str) -> Result<bool> {
        let deleted = self.store.delete_account(username).await?;
        debug!(username, deleted, "Deleted account");
        Ok(deleted)
    }

    /// Delete every account, returning how many were removed
    pub async fn delete_all_accounts(&self) -> Result<u64> {
        let count = self.store.delete_all_accounts().await?;
        debug!(count, "Deleted all accounts");
        Ok(count)
    }

    /// Number of stored accounts
    pub async fn count_accounts(&self) -> Result<i64> {
        self.store.count_accounts().await
    }

    /// Decrypt each device's public id in place, dropping devices whose
    /// ciphertext does not decode. Read-time filtering only - storage is
    /// never rewritten here.
    fn decrypt_account(&self, mut account: Account) -> Account {
        account.devices = account
            .devices
            .into_iter()
            .filter_map(|mut device| match self.cipher.decode(&device.public_id) {
                Some(plaintext) => {
                    device.public_id = plaintext;
                    Some(device)
                }
                None => {
                    debug!(
                        username = %account.username,
                        device_id = device.id,
                        "Dropping device with undecodable public id from read result"
                    );
                    None
                }
            })
            .collect();
        account
    }
}
