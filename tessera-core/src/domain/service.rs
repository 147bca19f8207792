//! Registered service domain model

use serde::{Deserialize, Serialize};

/// One application registered with the SSO server.
///
/// `service_id` is the URL pattern the application authenticates as;
/// `id` is the numeric identifier used by the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredService {
    pub id: i64,
    pub service_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl RegisteredService {
    pub fn new(id: i64, service_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            service_id: service_id.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Validate service definition data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.service_id.trim().is_empty() {
            return Err("service id cannot be empty");
        }
        if self.name.trim().is_empty() {
            return Err("service name cannot be empty");
        }
        Ok(())
    }
}
