//! Account and device domain models

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counter for generating unique device IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique device ID based on timestamp + counter
///
/// A raw millisecond timestamp collides as soon as two registrations land
/// in the same millisecond, so the lower 16 bits carry an atomic counter
/// (65536 unique IDs per millisecond per process).
pub fn generate_device_id() -> i64 {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    // Lower 48 bits of timestamp (good for ~8900 years), 16-bit counter
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    ((timestamp << 16) | counter) as i64
}

/// One enrolled hardware second-factor token.
///
/// `public_id` holds ciphertext while the device sits in storage and
/// plaintext in the detached copies returned by registry reads. The
/// registry encrypts before any persistence call, so plaintext identifiers
/// never reach a store adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    /// Caller-supplied display label. Not unique, not validated.
    pub name: String,
    pub public_id: String,
    /// Set once at registration, always UTC for cross-node comparability.
    pub registered_at: DateTime<Utc>,
}

impl Device {
    /// Create a device with a freshly generated ID and the current instant
    pub fn new(name: impl Into<String>, public_id: impl Into<String>) -> Self {
        Self {
            id: generate_device_id(),
            name: name.into(),
            public_id: public_id.into(),
            registered_at: Utc::now(),
        }
    }
}

/// The persisted binding between a username and its enrolled devices.
///
/// `devices` preserves registration order. An account with zero devices
/// can exist transiently in storage but reads treat it like any other
/// account (devices may also be empty because none of them decrypted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub devices: Vec<Device>,
}

impl Account {
    /// Create an account for a username with no devices yet
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            devices: Vec::new(),
        }
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username cannot be empty");
        }
        Ok(())
    }
}
