//! In-memory store adapters
//!
//! Backing maps behind an `RwLock`, for tests and demo wiring. Accounts
//! keep a `BTreeMap` so listing order is deterministic; device order
//! within an account is registration order, same as the DuckDB adapter.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, Device, RegisteredService};
use crate::ports::{CredentialStore, ServiceCatalog};

/// In-memory credential store
#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<BTreeMap<String, Account>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent read operations fail with a storage error, to
    /// exercise callers' unavailable paths.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent write operations fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::storage("simulated read failure"));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage("simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        self.check_reads()?;
        let accounts = self
            .accounts
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(accounts.get(username).cloned())
    }

    async fn get_accounts(&self) -> Result<Vec<Account>> {
        self.check_reads()?;
        let accounts = self
            .accounts
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(accounts.values().cloned().collect())
    }

    async fn append_device(&self, username: &str, device: &Device) -> Result<()> {
        self.check_writes()?;
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        accounts
            .entry(username.to_string())
            .or_insert_with(|| Account::new(username))
            .devices
            .push(device.clone());
        Ok(())
    }

    async fn delete_account(&self, username: &str) -> Result<bool> {
        self.check_writes()?;
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(accounts.remove(username).is_some())
    }

    async fn delete_all_accounts(&self) -> Result<u64> {
        self.check_writes()?;
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        let count = accounts.len() as u64;
        accounts.clear();
        Ok(count)
    }

    async fn count_accounts(&self) -> Result<i64> {
        self.check_reads()?;
        let accounts = self
            .accounts
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(accounts.len() as i64)
    }
}

/// In-memory service catalog
#[derive(Default)]
pub struct MemoryCatalog {
    services: RwLock<BTreeMap<i64, RegisteredService>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with definitions, for seeding tests
    pub fn with_services(services: Vec<RegisteredService>) -> Self {
        let map: BTreeMap<i64, RegisteredService> =
            services.into_iter().map(|s| (s.id, s)).collect();
        Self {
            services: RwLock::new(map),
        }
    }
}

#[async_trait]
impl ServiceCatalog for MemoryCatalog {
    async fn load(&self) -> Result<Vec<RegisteredService>> {
        let services = self
            .services
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(services.values().cloned().collect())
    }

    async fn find_by_service_id(&self, service_id: &str) -> Result<Option<RegisteredService>> {
        let services = self
            .services
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(services
            .values()
            .find(|s| s.service_id == service_id)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredService>> {
        let services = self
            .services
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(services.get(&id).cloned())
    }

    async fn save(&self, service: &RegisteredService) -> Result<()> {
        let mut services = self
            .services
            .write()
            .map_err(|e| Error::storage(e.to_string()))?;
        services.insert(service.id, service.clone());
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let services = self
            .services
            .read()
            .map_err(|e| Error::storage(e.to_string()))?;
        Ok(services.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_creates_then_appends() {
        let store = MemoryStore::new();
        let first = Device::new("first", "ct-1");
        let second = Device::new("second", "ct-2");

        store.append_device("alice", &first).await.unwrap();
        store.append_device("alice", &second).await.unwrap();

        let account = store.get_account("alice").await.unwrap().unwrap();
        assert_eq!(account.devices.len(), 2);
        assert_eq!(account.devices[0].name, "first");
        assert_eq!(store.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fail_reads_only_affects_reads() {
        let store = MemoryStore::new();
        store.fail_reads(true);

        assert!(store.get_accounts().await.is_err());
        let device = Device::new("key", "ct");
        assert!(store.append_device("alice", &device).await.is_ok());

        store.fail_reads(false);
        assert_eq!(store.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fail_writes_only_affects_writes() {
        let store = MemoryStore::new();
        let device = Device::new("key", "ct");
        store.append_device("alice", &device).await.unwrap();

        store.fail_writes(true);
        assert!(store.append_device("alice", &device).await.is_err());
        assert!(store.delete_account("alice").await.is_err());
        assert!(store.get_account("alice").await.unwrap().is_some());

        store.fail_writes(false);
        assert!(store.delete_account("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_catalog_find_by_both_keys() {
        let catalog = MemoryCatalog::with_services(vec![RegisteredService::new(
            7,
            "https://app.example.org/.*",
            "App",
        )]);

        assert!(catalog.find_by_id(7).await.unwrap().is_some());
        assert!(catalog
            .find_by_service_id("https://app.example.org/.*")
            .await
            .unwrap()
            .is_some());
        assert!(catalog.find_by_id(8).await.unwrap().is_none());
    }
}
