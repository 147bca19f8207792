//! Service catalog and ticket validation ports

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::RegisteredService;

/// Persistence boundary for registered service definitions
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Load every service definition
    async fn load(&self) -> Result<Vec<RegisteredService>>;

    /// Find a definition by its service id (URL pattern)
    async fn find_by_service_id(&self, service_id: &str) -> Result<Option<RegisteredService>>;

    /// Find a definition by its numeric id
    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredService>>;

    /// Insert or update a definition
    async fn save(&self, service: &RegisteredService) -> Result<()>;

    /// Number of stored definitions
    async fn count(&self) -> Result<i64>;
}

/// Outcome of a successful ticket validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    /// The authenticated principal the ticket was issued for
    pub principal: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Opaque ticket validation delegate.
///
/// The protocol layer that parses requests and renders responses lives
/// outside this crate; the registry side only needs a pipeline it can
/// hand a (service, ticket) pair to.
#[async_trait]
pub trait TicketValidationPipeline: Send + Sync {
    /// Validate a service ticket, returning the assertion it encodes
    async fn validate(&self, service: &str, ticket: &str) -> Result<Assertion>;
}
