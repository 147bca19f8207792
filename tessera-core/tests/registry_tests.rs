//! Integration tests for the credential registry
//!
//! These tests run the registry against a real DuckDB store and the real
//! AES-GCM cipher; only the OTP shape validator stands in for an upstream
//! verification service.
//!
//! Run with: cargo test --test registry_tests -- --nocapture

use std::sync::Arc;

use tempfile::TempDir;

use tessera_core::adapters::aes::AesGcmCipher;
use tessera_core::adapters::duckdb::DuckDbStore;
use tessera_core::adapters::otp::ModhexAccountValidator;
use tessera_core::domain::Device;
use tessera_core::ports::{Cipher, CredentialStore};
use tessera_core::services::{CredentialRegistry, RegistrationRequest};

// ============================================================================
// Test Helpers
// ============================================================================

/// 32 modhex chars standing in for the per-press passcode
const PASSCODE: &str = "dteffujehknhfjbrjnlnldnhcujvddki";

/// Create a test store with schema initialized
fn create_test_store(temp_dir: &TempDir) -> Arc<DuckDbStore> {
    let db_path = temp_dir.path().join("test.duckdb");
    let store = DuckDbStore::new(&db_path).expect("Failed to create store");
    store.ensure_schema().expect("Failed to initialize schema");
    Arc::new(store)
}

fn create_registry(store: Arc<DuckDbStore>, key: [u8; 32]) -> CredentialRegistry {
    CredentialRegistry::new(
        store,
        Arc::new(AesGcmCipher::new(&key)),
        Arc::new(ModhexAccountValidator::new()),
    )
}

/// Build a valid token whose extracted public id is `public_id`
fn token_for(public_id: &str) -> String {
    format!("{public_id}{PASSCODE}")
}

fn request(username: &str, public_id: &str, name: &str) -> RegistrationRequest {
    RegistrationRequest {
        username: username.to_string(),
        token: token_for(public_id),
        device_name: name.to_string(),
    }
}

// ============================================================================
// Registration scenario
// ============================================================================

#[tokio::test]
async fn test_register_and_read_back_single_device() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store, [1u8; 32]);

    let ok = registry
        .register_device(&request("alice", "ccccccbdefgh", "YubiKey-1"))
        .await
        .unwrap();
    assert!(ok);

    let account = registry.get_account("alice").await.unwrap().unwrap();
    assert_eq!(account.username, "alice");
    assert_eq!(account.devices.len(), 1);
    assert_eq!(account.devices[0].name, "YubiKey-1");
    assert_eq!(account.devices[0].public_id, "ccccccbdefgh");

    let accounts = registry.get_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].username, "alice");
    assert_eq!(accounts[0].devices.len(), 1);
}

#[tokio::test]
async fn test_second_registration_appends_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store, [1u8; 32]);

    registry
        .register_device(&request("alice", "ccccccbdefgh", "YubiKey-1"))
        .await
        .unwrap();
    registry
        .register_device(&request("alice", "ccccccehghij", "YubiKey-2"))
        .await
        .unwrap();

    let account = registry.get_account("alice").await.unwrap().unwrap();
    assert_eq!(account.devices.len(), 2);
    assert_eq!(account.devices[0].name, "YubiKey-1");
    assert_eq!(account.devices[0].public_id, "ccccccbdefgh");
    assert_eq!(account.devices[1].name, "YubiKey-2");
    assert_eq!(account.devices[1].public_id, "ccccccehghij");
}

#[tokio::test]
async fn test_invalid_token_registers_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store.clone(), [1u8; 32]);

    let bad = RegistrationRequest {
        username: "alice".to_string(),
        token: "not-a-modhex-token".to_string(),
        device_name: "YubiKey-1".to_string(),
    };
    let ok = registry.register_device(&bad).await.unwrap();
    assert!(!ok);

    assert!(registry.get_account("alice").await.unwrap().is_none());
    assert_eq!(store.count_accounts().await.unwrap(), 0);
}

// ============================================================================
// Encryption at rest
// ============================================================================

#[tokio::test]
async fn test_stored_public_id_is_ciphertext() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store.clone(), [1u8; 32]);

    registry
        .register_device(&request("alice", "ccccccbdefgh", "YubiKey-1"))
        .await
        .unwrap();

    // Bypass the registry: the raw stored value must not be the plaintext
    // and must decode back to it under the registry's key.
    let raw = store.get_account("alice").await.unwrap().unwrap();
    assert_ne!(raw.devices[0].public_id, "ccccccbdefgh");

    let cipher = AesGcmCipher::new(&[1u8; 32]);
    assert_eq!(
        cipher.decode(&raw.devices[0].public_id),
        Some("ccccccbdefgh".to_string())
    );
}

#[tokio::test]
async fn test_undecodable_device_hidden_but_kept() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store.clone(), [1u8; 32]);

    registry
        .register_device(&request("alice", "ccccccbdefgh", "YubiKey-1"))
        .await
        .unwrap();

    // A device written under a different key, as after key loss
    let foreign_cipher = AesGcmCipher::new(&[2u8; 32]);
    let foreign_ct = foreign_cipher.encode("ccccccehghij").unwrap();
    let stale = Device::new("old-key-device", foreign_ct);
    store.append_device("alice", &stale).await.unwrap();

    let account = registry.get_account("alice").await.unwrap().unwrap();
    assert_eq!(account.devices.len(), 1);
    assert_eq!(account.devices[0].name, "YubiKey-1");

    let accounts = registry.get_accounts().await.unwrap();
    assert_eq!(accounts[0].devices.len(), 1);

    // The device is only hidden from reads, not purged
    let raw = store.get_account("alice").await.unwrap().unwrap();
    assert_eq!(raw.devices.len(), 2);
}

#[tokio::test]
async fn test_fully_undecodable_account_listed_with_empty_devices() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store.clone(), [1u8; 32]);

    let foreign_cipher = AesGcmCipher::new(&[2u8; 32]);
    let foreign_ct = foreign_cipher.encode("ccccccbdefgh").unwrap();
    store
        .append_device("bob", &Device::new("old", foreign_ct))
        .await
        .unwrap();

    let accounts = registry.get_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].username, "bob");
    assert!(accounts[0].devices.is_empty());
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_account_then_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store, [1u8; 32]);

    registry
        .register_device(&request("alice", "ccccccbdefgh", "YubiKey-1"))
        .await
        .unwrap();

    assert!(registry.delete_account("alice").await.unwrap());
    assert!(registry.get_account("alice").await.unwrap().is_none());

    // Missing account: no-op, not an error
    assert!(!registry.delete_account("alice").await.unwrap());
    assert!(!registry.delete_account("never-existed").await.unwrap());
}

#[tokio::test]
async fn test_delete_all_accounts() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_test_store(&temp_dir);
    let registry = create_registry(store.clone(), [1u8; 32]);

    for (user, pubid) in [
        ("alice", "ccccccbdefgh"),
        ("bob", "ccccccehghij"),
        ("carol", "ccccccklnrtu"),
    ] {
        registry
            .register_device(&request(user, pubid, "key"))
            .await
            .unwrap();
    }

    assert_eq!(registry.delete_all_accounts().await.unwrap(), 3);
    assert!(registry.get_accounts().await.unwrap().is_empty());
    assert_eq!(store.count_accounts().await.unwrap(), 0);
}

// ============================================================================
// Persistence across reopen
// ============================================================================

#[tokio::test]
async fn test_devices_survive_store_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.duckdb");

    {
        let store = Arc::new(DuckDbStore::new(&db_path).unwrap());
        store.ensure_schema().unwrap();
        let registry = create_registry(store, [1u8; 32]);
        registry
            .register_device(&request("alice", "ccccccbdefgh", "YubiKey-1"))
            .await
            .unwrap();
    }

    let store = Arc::new(DuckDbStore::new(&db_path).unwrap());
    store.ensure_schema().unwrap();
    let registry = create_registry(store, [1u8; 32]);

    let account = registry.get_account("alice").await.unwrap().unwrap();
    assert_eq!(account.devices.len(), 1);
    assert_eq!(account.devices[0].public_id, "ccccccbdefgh");
}

#[tokio::test]
async fn test_corrupt_registration_timestamp_surfaces_as_error() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.duckdb");

    {
        let store = Arc::new(DuckDbStore::new(&db_path).unwrap());
        store.ensure_schema().unwrap();
        let registry = create_registry(store, [1u8; 32]);
        registry
            .register_device(&request("alice", "ccccccbdefgh", "YubiKey-1"))
            .await
            .unwrap();
    }

    // Corrupt the stored timestamp directly, then reopen
    {
        let conn = duckdb::Connection::open(&db_path).unwrap();
        conn.execute("UPDATE devices SET registered_at = 'garbage'", [])
            .unwrap();
    }

    let store = Arc::new(DuckDbStore::new(&db_path).unwrap());
    store.ensure_schema().unwrap();
    let registry = create_registry(store, [1u8; 32]);

    // Corruption must not be papered over with a fabricated instant
    assert!(registry.get_account("alice").await.is_err());
}
