//! Validation gateway - ticket validation at the registry boundary
//!
//! The wire protocol (request parsing, XML/JSON rendering, proxying) lives
//! outside this crate. The gateway only enforces that validation requests
//! name a registered service and a ticket before handing off to the
//! injected pipeline.

use std::sync::Arc;

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::ports::{Assertion, ServiceCatalog, TicketValidationPipeline};

/// Validates service tickets against the service catalog
pub struct ValidationGateway {
    catalog: Arc<dyn ServiceCatalog>,
    pipeline: Arc<dyn TicketValidationPipeline>,
}

impl ValidationGateway {
    pub fn new(
        catalog: Arc<dyn ServiceCatalog>,
        pipeline: Arc<dyn TicketValidationPipeline>,
    ) -> Self {
        Self { catalog, pipeline }
    }

    /// Validate a ticket for a service.
    ///
    /// Fails with `Validation` for blank inputs, `NotFound` for a service
    /// missing from the catalog; otherwise delegates to the pipeline and
    /// returns its assertion.
    pub async fn validate(&self, service: &str, ticket: &str) -> Result<Assertion> {
        if service.trim().is_empty() {
            return Err(Error::validation("service must not be blank"));
        }
        if ticket.trim().is_empty() {
            return Err(Error::validation("ticket must not be blank"));
        }

        let registered = self
            .catalog
            .find_by_service_id(service)
            .await?
            .ok_or_else(|| Error::not_found(format!("service [{service}] is not registered")))?;

        debug!(ticket, service = %registered.name, "Validating ticket for registered service");
        self.pipeline.validate(service, ticket).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryCatalog;
    use crate::domain::RegisteredService;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct AcceptingPipeline;

    #[async_trait]
    impl TicketValidationPipeline for AcceptingPipeline {
        async fn validate(&self, _service: &str, _ticket: &str) -> Result<Assertion> {
            Ok(Assertion {
                principal: "casuser".to_string(),
                attributes: HashMap::new(),
            })
        }
    }

    fn gateway() -> ValidationGateway {
        let catalog = Arc::new(MemoryCatalog::with_services(vec![RegisteredService::new(
            1,
            "https://app.example.org/.*",
            "App",
        )]));
        ValidationGateway::new(catalog, Arc::new(AcceptingPipeline))
    }

    #[tokio::test]
    async fn test_registered_service_validates() {
        let assertion = gateway()
            .validate("https://app.example.org/.*", "ST-1-abcdef")
            .await
            .unwrap();
        assert_eq!(assertion.principal, "casuser");
    }

    #[tokio::test]
    async fn test_unregistered_service_rejected() {
        let err = gateway()
            .validate("https://evil.example.org/", "ST-1-abcdef")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_inputs_rejected() {
        let gw = gateway();
        assert!(matches!(
            gw.validate("", "ST-1").await.unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            gw.validate("https://app.example.org/.*", "  ").await.unwrap_err(),
            Error::Validation(_)
        ));
    }
}
