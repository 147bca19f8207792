//! Catalog initializer - seeds the service catalog on startup
//!
//! Loads static JSON service definitions into the backing catalog when
//! configured to, skipping definitions that already exist. Idempotent, so
//! it is safe to run on every startup.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::result::Result;
use crate::ports::ServiceCatalog;

/// Seeds a service catalog from a static definition source
pub struct CatalogInitializer {
    seed: Arc<dyn ServiceCatalog>,
    catalog: Arc<dyn ServiceCatalog>,
    init_from_json: bool,
}

impl CatalogInitializer {
    pub fn new(
        seed: Arc<dyn ServiceCatalog>,
        catalog: Arc<dyn ServiceCatalog>,
        init_from_json: bool,
    ) -> Self {
        Self {
            seed,
            catalog,
            init_from_json,
        }
    }

    /// Initialize the catalog from seed definitions if configured.
    ///
    /// Definitions whose service id or numeric id already exist in the
    /// catalog are skipped, never overwritten.
    pub async fn initialize(&self) -> Result<InitializeResult> {
        let existing = self.catalog.count().await?;
        debug!(existing, "Service catalog size before initialization");

        if !self.init_from_json {
            info!(
                "Service catalog will not be initialized from JSON definitions. If the catalog \
                 ends up empty, ticket validation will refuse every service until definitions \
                 are registered."
            );
            return Ok(InitializeResult {
                loaded: 0,
                skipped: 0,
                total: existing,
            });
        }

        warn!(
            "Service catalog is auto-initialized from JSON definitions. This is intended for \
             testing; production deployments should register definitions explicitly."
        );

        let mut loaded = 0u64;
        let mut skipped = 0u64;
        for service in self.seed.load().await? {
            if let Some(existing) = self.catalog.find_by_service_id(&service.service_id).await? {
                warn!(
                    seed = %service.name,
                    existing = %existing.name,
                    "Skipping seed definition, matching service id already registered"
                );
                skipped += 1;
                continue;
            }
            if let Some(existing) = self.catalog.find_by_id(service.id).await? {
                warn!(
                    seed = %service.name,
                    existing = %existing.name,
                    id = service.id,
                    "Skipping seed definition, matching numeric id already registered"
                );
                skipped += 1;
                continue;
            }
            debug!(name = %service.name, id = service.id, "Seeding service definition");
            self.catalog.save(&service).await?;
            loaded += 1;
        }

        let total = self.catalog.count().await?;
        info!(total, loaded, skipped, "Service catalog initialized");
        Ok(InitializeResult {
            loaded,
            skipped,
            total,
        })
    }
}

/// Outcome of a catalog initialization run
#[derive(Debug, Clone, Serialize)]
pub struct InitializeResult {
    pub loaded: u64,
    pub skipped: u64,
    pub total: i64,
}
