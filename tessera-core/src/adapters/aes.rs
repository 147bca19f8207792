//! AES-256-GCM cipher implementation
//!
//! Ciphertext layout: base64(nonce || ct). Nonces are random 12-byte
//! values and never reused; the GCM tag authenticates the ciphertext, so
//! tampering or a foreign key shows up as a decode failure rather than
//! garbage plaintext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::Engine;
use rand::RngCore;

use crate::domain::result::{Error, Result};
use crate::ports::Cipher;

const NONCE_LEN: usize = 12;

/// AES-256-GCM cipher over a 32-byte key
pub struct AesGcmCipher {
    cipher: Aes256Gcm,
}

impl AesGcmCipher {
    pub fn new(key: &[u8; 32]) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Build a cipher from a hex-encoded 32-byte key (as produced by the
    /// key service)
    pub fn from_hex_key(hex_key: &str) -> Result<Self> {
        let bytes = hex::decode(hex_key).map_err(|e| Error::encryption(e.to_string()))?;
        let key: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::encryption("cipher key must be 32 bytes"))?;
        Ok(Self::new(&key))
    }
}

impl Cipher for AesGcmCipher {
    fn encode(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| Error::encryption(format!("AES-GCM encryption failed: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(base64::engine::general_purpose::STANDARD.encode(blob))
    }

    fn decode(&self, ciphertext: &str) -> Option<String> {
        let blob = base64::engine::general_purpose::STANDARD
            .decode(ciphertext)
            .ok()?;
        if blob.len() <= NONCE_LEN {
            return None;
        }
        let (nonce_bytes, ct) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self.cipher.decrypt(nonce, ct).ok()?;
        String::from_utf8(plaintext).ok()
    }
}
