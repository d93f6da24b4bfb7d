//! Local-storage style key/value persistence.
//!
//! Services that keep JSON blobs per user talk to [`KeyValueStore`] so the
//! medium can be SQLite in production and a plain map in tests.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::repositories::storage_repository::StorageRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    fn put(&self, key: &str, value: &str) -> AppResult<()>;

    /// Returns whether the key existed.
    fn remove(&self, key: &str) -> AppResult<bool>;
}

pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> AppResult<Option<T>> {
    store
        .get(key)?
        .map(|raw| serde_json::from_str(&raw).map_err(AppError::from))
        .transpose()
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw)
}

#[derive(Clone, Debug)]
pub struct SqliteKeyValueStore {
    db: DbPool,
}

impl SqliteKeyValueStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.db
            .with_connection(|conn| StorageRepository::get(conn, key))
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| StorageRepository::put(conn, key, value))
    }

    fn remove(&self, key: &str) -> AppResult<bool> {
        self.db
            .with_connection(|conn| StorageRepository::remove(conn, key))
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| AppError::other("memory store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| AppError::other("memory store lock poisoned"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<bool> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| AppError::other("memory store lock poisoned"))?;
        Ok(guard.remove(key).is_some())
    }
}
