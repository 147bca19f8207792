//! DuckDB store implementation
//!
//! One embedded database file holds accounts, their registered devices,
//! and the service catalog. All access funnels through a single
//! mutex-guarded connection; mutations additionally run inside explicit
//! transactions, so a read-modify-write like `append_device` commits as a
//! whole or not at all.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use tracing::{debug, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{Account, Device, RegisteredService};
use crate::ports::{CredentialStore, ServiceCatalog};

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

fn db_err(e: duckdb::Error) -> Error {
    Error::storage(e.to_string())
}

/// DuckDB-backed credential store and service catalog
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbStore {
    /// Open (or create) the registry database.
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when another registry process holds the
    /// file during startup.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Connection::open(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        warn!(
                            attempt = attempt + 1,
                            max = MAX_RETRIES,
                            delay_ms = delay.as_millis() as u64,
                            "Registry database busy, retrying"
                        );
                        thread::sleep(delay);
                        last_error = Some(db_err(e));
                        continue;
                    }
                    return Err(db_err(e));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::storage(format!("failed to open database after {MAX_RETRIES} retries"))
        }))
    }

    /// Create tables if they do not exist yet
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS accounts (
                username TEXT PRIMARY KEY
            );
            CREATE TABLE IF NOT EXISTS devices (
                id BIGINT NOT NULL,
                username TEXT NOT NULL,
                name TEXT NOT NULL,
                public_id TEXT NOT NULL,
                registered_at TEXT NOT NULL,
                seq BIGINT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS services (
                id BIGINT PRIMARY KEY,
                service_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT
            );",
        )
        .map_err(db_err)?;
        debug!(path = %self.db_path.display(), "Registry schema ensured");
        Ok(())
    }

    fn row_to_device(row: &duckdb::Row) -> duckdb::Result<Device> {
        let registered_at: String = row.get(3)?;
        Ok(Device {
            id: row.get(0)?,
            name: row.get(1)?,
            public_id: row.get(2)?,
            registered_at: parse_timestamp(&registered_at).map_err(|e| {
                duckdb::Error::FromSqlConversionFailure(3, duckdb::types::Type::Text, Box::new(e))
            })?,
        })
    }

    fn row_to_service(row: &duckdb::Row) -> duckdb::Result<RegisteredService> {
        Ok(RegisteredService {
            id: row.get(0)?,
            service_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
        })
    }

    fn devices_for(conn: &Connection, username: &str) -> Result<Vec<Device>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, name, public_id, registered_at FROM devices
                 WHERE username = ? ORDER BY seq",
            )
            .map_err(db_err)?;
        let devices = stmt
            .query_map(params![username], Self::row_to_device)
            .map_err(db_err)?
            .collect::<duckdb::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(devices)
    }
}

#[async_trait]
impl CredentialStore for DuckDbStore {
    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;

        let exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM accounts WHERE username = ?",
                params![username],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        if exists == 0 {
            return Ok(None);
        }

        let devices = Self::devices_for(&conn, username)?;
        Ok(Some(Account {
            username: username.to_string(),
            devices,
        }))
    }

    async fn get_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;

        let mut stmt = conn
            .prepare("SELECT username FROM accounts ORDER BY username")
            .map_err(db_err)?;
        let usernames = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_err)?
            .collect::<duckdb::Result<Vec<_>>>()
            .map_err(db_err)?;

        let mut accounts = Vec::with_capacity(usernames.len());
        for username in usernames {
            let devices = Self::devices_for(&conn, &username)?;
            accounts.push(Account { username, devices });
        }
        Ok(accounts)
    }

    async fn append_device(&self, username: &str, device: &Device) -> Result<()> {
        let mut conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        let tx = conn.transaction().map_err(db_err)?;

        tx.execute(
            "INSERT INTO accounts (username)
             SELECT ? WHERE NOT EXISTS (SELECT 1 FROM accounts WHERE username = ?)",
            params![username, username],
        )
        .map_err(db_err)?;

        let next_seq: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(seq), 0) + 1 FROM devices WHERE username = ?",
                params![username],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        tx.execute(
            "INSERT INTO devices (id, username, name, public_id, registered_at, seq)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                device.id,
                username,
                device.name,
                device.public_id,
                device.registered_at.to_rfc3339(),
                next_seq
            ],
        )
        .map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(())
    }

    async fn delete_account(&self, username: &str) -> Result<bool> {
        let mut conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        let tx = conn.transaction().map_err(db_err)?;

        tx.execute("DELETE FROM devices WHERE username = ?", params![username])
            .map_err(db_err)?;
        let removed = tx
            .execute("DELETE FROM accounts WHERE username = ?", params![username])
            .map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(removed > 0)
    }

    async fn delete_all_accounts(&self) -> Result<u64> {
        let mut conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        let tx = conn.transaction().map_err(db_err)?;

        tx.execute("DELETE FROM devices", []).map_err(db_err)?;
        let removed = tx.execute("DELETE FROM accounts", []).map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(removed as u64)
    }

    async fn count_accounts(&self) -> Result<i64> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .map_err(db_err)
    }
}

#[async_trait]
impl ServiceCatalog for DuckDbStore {
    async fn load(&self) -> Result<Vec<RegisteredService>> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT id, service_id, name, description FROM services ORDER BY id")
            .map_err(db_err)?;
        let services = stmt
            .query_map([], Self::row_to_service)
            .map_err(db_err)?
            .collect::<duckdb::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(services)
    }

    async fn find_by_service_id(&self, service_id: &str) -> Result<Option<RegisteredService>> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT id, service_id, name, description FROM services
                 WHERE service_id = ? LIMIT 1",
            )
            .map_err(db_err)?;
        let mut rows = stmt
            .query_map(params![service_id], Self::row_to_service)
            .map_err(db_err)?;
        match rows.next() {
            Some(row) => Ok(Some(row.map_err(db_err)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredService>> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT id, service_id, name, description FROM services
                 WHERE id = ? LIMIT 1",
            )
            .map_err(db_err)?;
        let mut rows = stmt
            .query_map(params![id], Self::row_to_service)
            .map_err(db_err)?;
        match rows.next() {
            Some(row) => Ok(Some(row.map_err(db_err)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, service: &RegisteredService) -> Result<()> {
        let mut conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        let tx = conn.transaction().map_err(db_err)?;

        tx.execute("DELETE FROM services WHERE id = ?", params![service.id])
            .map_err(db_err)?;
        tx.execute(
            "INSERT INTO services (id, service_id, name, description)
             VALUES (?, ?, ?, ?)",
            params![
                service.id,
                service.service_id,
                service.name,
                service.description
            ],
        )
        .map_err(db_err)?;

        tx.commit().map_err(db_err)?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let conn = self.conn.lock().map_err(|e| Error::storage(e.to_string()))?;
        conn.query_row("SELECT COUNT(*) FROM services", [], |row| row.get(0))
            .map_err(db_err)
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::storage(format!("corrupt registration timestamp '{s}': {e}")))
}
