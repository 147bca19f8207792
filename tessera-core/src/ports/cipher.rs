//! Cipher port - device identifier encryption boundary
//!
//! The registry depends on `Arc<dyn Cipher>` and never sees key material.
//! Decode failure is a value (`None`), never a panic: stored ciphertext
//! may have been written under a key that is no longer available, and a
//! single undecodable device must not take down a whole account read.

use crate::domain::result::Result;

/// Encrypts and decrypts device public identifiers.
///
/// Implementations own the key material. Key configuration is process-wide
/// and read-only, so implementations must be safe for unsynchronized
/// concurrent use (`Send + Sync`).
pub trait Cipher: Send + Sync {
    /// Encrypt a plaintext identifier into an opaque ciphertext string
    fn encode(&self, plaintext: &str) -> Result<String>;

    /// Decrypt a ciphertext previously produced by `encode`.
    ///
    /// Returns `None` for malformed or foreign ciphertext.
    fn decode(&self, ciphertext: &str) -> Option<String>;
}

/// No-op cipher for tests and deployments without at-rest encryption.
/// Identifiers pass through unchanged.
pub struct PassthroughCipher;

impl Cipher for PassthroughCipher {
    fn encode(&self, plaintext: &str) -> Result<String> {
        Ok(plaintext.to_string())
    }

    fn decode(&self, ciphertext: &str) -> Option<String> {
        Some(ciphertext.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_round_trip() {
        let cipher = PassthroughCipher;
        let ct = cipher.encode("ccccccbdefgh").unwrap();
        assert_eq!(cipher.decode(&ct), Some("ccccccbdefgh".to_string()));
    }
}
