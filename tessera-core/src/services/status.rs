//! Status service - registry summaries

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::EncryptionStatus;
use crate::ports::{CredentialStore, ServiceCatalog};

/// Status service for registry summaries
pub struct StatusService {
    store: Arc<dyn CredentialStore>,
    catalog: Arc<dyn ServiceCatalog>,
}

impl StatusService {
    pub fn new(store: Arc<dyn CredentialStore>, catalog: Arc<dyn ServiceCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Get overall status summary
    pub async fn get_status(&self, encryption: EncryptionStatus) -> Result<StatusSummary> {
        let accounts = self.store.get_accounts().await?;
        let total_devices = accounts.iter().map(|a| a.devices.len() as i64).sum();
        let total_services = self.catalog.count().await?;

        Ok(StatusSummary {
            total_accounts: accounts.len() as i64,
            total_devices,
            total_services,
            encryption,
            accounts: accounts
                .into_iter()
                .map(|a| AccountSummary {
                    username: a.username,
                    device_count: a.devices.len() as i64,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub total_devices: i64,
    pub total_services: i64,
    pub encryption: EncryptionStatus,
    pub accounts: Vec<AccountSummary>,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub username: String,
    pub device_count: i64,
}
