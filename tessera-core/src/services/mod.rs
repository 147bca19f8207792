//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod catalog;
pub mod encryption;
mod registry;
mod status;
mod validation;

pub use catalog::{CatalogInitializer, InitializeResult};
pub use encryption::KeyService;
pub use registry::{CredentialRegistry, RegistrationRequest};
pub use status::{AccountSummary, StatusService, StatusSummary};
pub use validation::ValidationGateway;
