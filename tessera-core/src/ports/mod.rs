//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod catalog;
mod cipher;
mod store;
mod validator;

pub use catalog::{Assertion, ServiceCatalog, TicketValidationPipeline};
pub use cipher::{Cipher, PassthroughCipher};
pub use store::CredentialStore;
pub use validator::AccountValidator;
