//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod encryption;
pub mod result;
mod service;

pub use account::{generate_device_id, Account, Device};
pub use encryption::{Argon2Params, EncryptionMetadata, EncryptionStatus};
pub use service::RegisteredService;
