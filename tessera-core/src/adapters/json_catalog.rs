//! JSON-directory service catalog
//!
//! Each service definition lives in its own `<id>.json` file inside the
//! catalog directory. Used as the seed source for catalog initialization
//! and as a flat-file catalog for small deployments.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::result::{Error, Result};
use crate::domain::RegisteredService;
use crate::ports::ServiceCatalog;

/// Service catalog over a directory of JSON definitions
pub struct JsonServiceCatalog {
    dir: PathBuf,
}

impl JsonServiceCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_all(&self) -> Result<Vec<RegisteredService>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut services = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<RegisteredService>(&content) {
                Ok(service) => services.push(service),
                Err(e) => {
                    // A broken definition should not hide the rest
                    warn!(path = %path.display(), error = %e, "Skipping unparsable service definition");
                }
            }
        }
        services.sort_by_key(|s| s.id);
        Ok(services)
    }
}

#[async_trait]
impl ServiceCatalog for JsonServiceCatalog {
    async fn load(&self) -> Result<Vec<RegisteredService>> {
        self.read_all()
    }

    async fn find_by_service_id(&self, service_id: &str) -> Result<Option<RegisteredService>> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|s| s.service_id == service_id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredService>> {
        Ok(self.read_all()?.into_iter().find(|s| s.id == id))
    }

    async fn save(&self, service: &RegisteredService) -> Result<()> {
        service.validate().map_err(Error::validation)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.json", service.id));
        let content = serde_json::to_string_pretty(service)?;
        fs::write(path, content)?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.read_all()?.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let catalog = JsonServiceCatalog::new(dir.path());

        let svc = RegisteredService::new(100, "https://app.example.org/.*", "App");
        catalog.save(&svc).await.unwrap();

        let loaded = catalog.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].service_id, "https://app.example.org/.*");
        assert_eq!(catalog.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let catalog = JsonServiceCatalog::new(dir.path().join("nope"));
        assert!(catalog.load().await.unwrap().is_empty());
        assert_eq!(catalog.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unparsable_definition_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();

        let catalog = JsonServiceCatalog::new(dir.path());
        let svc = RegisteredService::new(5, "https://wiki.example.org/.*", "Wiki");
        catalog.save(&svc).await.unwrap();

        let loaded = catalog.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 5);
    }
}
