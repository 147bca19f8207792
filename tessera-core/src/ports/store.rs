//! Credential store port - persistence abstraction

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{Account, Device};

/// Account persistence abstraction
///
/// This trait defines all storage operations for account aggregates.
/// Adapters provide the actual persistence logic. Devices arrive here with
/// `public_id` already encrypted; the store never sees plaintext
/// identifiers and never decrypts anything.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Get the account for a username, devices in registration order
    async fn get_account(&self, username: &str) -> Result<Option<Account>>;

    /// Get all accounts
    async fn get_accounts(&self) -> Result<Vec<Account>>;

    /// Append a device to the username's account, creating the account if
    /// it does not exist yet.
    ///
    /// Must be atomic: the account lookup and the device insert happen in
    /// one storage transaction, so two concurrent appends for the same
    /// username can never lose an update.
    async fn append_device(&self, username: &str, device: &Device) -> Result<()>;

    /// Delete the account for a username.
    ///
    /// Returns whether an account was actually removed; a missing account
    /// is not an error.
    async fn delete_account(&self, username: &str) -> Result<bool>;

    /// Delete every account, returning how many were removed
    async fn delete_all_accounts(&self) -> Result<u64>;

    /// Number of stored accounts
    async fn count_accounts(&self) -> Result<i64>;
}
