//! Configuration management
//!
//! Settings live in `settings.json` inside the tessera directory:
//! ```json
//! {
//!   "app": { "initServicesFromJson": false }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    init_services_from_json: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Tessera configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub init_services_from_json: bool,
    /// Directory holding JSON seed service definitions
    pub services_dir: PathBuf,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the tessera directory
    ///
    /// Catalog seeding can be enabled via:
    /// 1. Settings file (`app.initServicesFromJson`)
    /// 2. Environment variable TESSERA_INIT_SERVICES (for CI/testing)
    pub fn load(tessera_dir: &Path) -> Result<Self> {
        let settings_path = tessera_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let init_services_from_json = match std::env::var("TESSERA_INIT_SERVICES").ok().as_deref()
        {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.init_services_from_json,
        };

        Ok(Self {
            init_services_from_json,
            services_dir: tessera_dir.join("services"),
            _raw_settings: raw,
        })
    }

    /// Save config to the tessera directory.
    /// Preserves settings that tessera doesn't manage.
    pub fn save(&self, tessera_dir: &Path) -> Result<()> {
        let settings_path = tessera_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.init_services_from_json = self.init_services_from_json;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_file_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.init_services_from_json);
        assert_eq!(config.services_dir, dir.path().join("services"));
    }

    #[test]
    fn test_save_preserves_unmanaged_settings() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"initServicesFromJson": true, "theme": "dark"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert!(config.init_services_from_json);
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(content.contains("theme"));
        assert!(content.contains("initServicesFromJson"));
    }
}
