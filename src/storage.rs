//! Persistent key/value storage shared by the HTTP client, the session and
//! the locale context.
//!
//! Single writer per process. Values are plain strings; callers serialize
//! structured values (the cached profile) themselves.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::{self, repository::local_storage, DatabaseError};

/// Bearer token issued by the backend.
pub const TOKEN_KEY: &str = "token";
/// Selected language code (`en` / `ar`).
pub const LANGUAGE_KEY: &str = "i18nextLng";
/// Cached profile JSON of the signed-in user.
pub const USER_KEY: &str = "user";
/// Selected colour theme (`light` / `dark`).
pub const THEME_KEY: &str = "theme";

/// Key/value persistence seam.
pub trait LocalStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
    fn remove(&self, key: &str) -> Result<(), DatabaseError>;
}

/// Shared handle used throughout the crate.
pub type SharedStorage = Arc<dyn LocalStorage>;

/// Read a key, logging and swallowing storage failures. Readers treat an
/// unreadable value like an absent one.
pub fn read_or_none(storage: &dyn LocalStorage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Local storage read failed");
            None
        }
    }
}

/// Remove a key, logging failures.
pub fn remove_logged(storage: &dyn LocalStorage, key: &str) {
    if let Err(e) = storage.remove(key) {
        tracing::warn!(key, error = %e, "Local storage remove failed");
    }
}

/// Write a key, logging failures.
pub fn write_logged(storage: &dyn LocalStorage, key: &str, value: &str) {
    if let Err(e) = storage.set(key, value) {
        tracing::warn!(key, error = %e, "Local storage write failed");
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory storage
// ═══════════════════════════════════════════════════════════

/// Process-local storage. Used by tests and by sessions that must not
/// leave anything on disk.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with the given pairs.
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let values = self.values.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let mut values = self.values.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        let mut values = self.values.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// SQLite storage
// ═══════════════════════════════════════════════════════════

/// Storage backed by a SQLite file under the app data directory.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the storage file and run migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = db::open_database(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory SQLite storage (same code path as on-disk, nothing persisted).
    pub fn in_memory() -> Result<Self, DatabaseError> {
        let conn = db::open_memory_database()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl LocalStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        local_storage::get_value(&conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        local_storage::set_value(&conn, key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        local_storage::delete_value(&conn, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn memory_storage_seeded() {
        let storage = MemoryStorage::with(&[(LANGUAGE_KEY, "ar")]);
        assert_eq!(read_or_none(&storage, LANGUAGE_KEY).as_deref(), Some("ar"));
    }

    #[test]
    fn sqlite_storage_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("local_storage.db");
        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.set(TOKEN_KEY, "persisted-token").unwrap();
            storage.set(THEME_KEY, "dark").unwrap();
        }
        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get(TOKEN_KEY).unwrap().as_deref(),
            Some("persisted-token")
        );
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn sqlite_storage_remove() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.set(USER_KEY, "{}").unwrap();
        remove_logged(&storage, USER_KEY);
        assert_eq!(read_or_none(&storage, USER_KEY), None);
    }
}
