//! # redb-backed Settings Store
//!
//! A disk-backed settings store using the redb embedded database.
//!
//! The whole key space is loaded into an in-memory cache at open; reads
//! and writes go against the cache, and `sync()` rewrites the table in a
//! single ACID transaction. Dropping the store syncs best-effort, so a
//! forgotten flush degrades to the usual settings-file semantics rather
//! than data loss mid-file.
//!
//! Values are postcard-encoded [`Value`]s in one `&str -> &[u8]` table.

use super::{SettingsStore, scoped_key};
use crate::primitives::MAX_VALUE_BYTES;
use crate::types::{KeepsakeError, Value};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::path::Path;

/// Table for settings entries: joined key -> postcard-encoded Value.
const SETTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

/// A disk-backed settings store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
    /// In-memory view of the full key space.
    cache: BTreeMap<String, Value>,
    /// Current scope chain.
    scope: Vec<String>,
    /// Whether the cache has diverged from disk.
    dirty: bool,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("entries", &self.cache.len())
            .field("scope_depth", &self.scope.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a settings database at the given path.
    ///
    /// Every persisted value is size-checked against
    /// [`MAX_VALUE_BYTES`] before decoding.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KeepsakeError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| KeepsakeError::IoError(e.to_string()))?;

        // Initialize the table if it doesn't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(SETTINGS)
                .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
        }

        let read_txn = db
            .begin_read()
            .map_err(|e| KeepsakeError::IoError(e.to_string()))?;

        let cache = {
            let table = read_txn
                .open_table(SETTINGS)
                .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
            let mut cache = BTreeMap::new();
            for entry in table
                .iter()
                .map_err(|e| KeepsakeError::IoError(e.to_string()))?
            {
                let (key, bytes) = entry.map_err(|e| KeepsakeError::IoError(e.to_string()))?;
                let payload = bytes.value();
                if payload.len() > MAX_VALUE_BYTES {
                    return Err(KeepsakeError::DeserializationError(format!(
                        "Value for '{}' is {} bytes, exceeds maximum allowed {} bytes",
                        key.value(),
                        payload.len(),
                        MAX_VALUE_BYTES
                    )));
                }
                let value: Value = postcard::from_bytes(payload)
                    .map_err(|e| KeepsakeError::DeserializationError(e.to_string()))?;
                cache.insert(key.value().to_string(), value);
            }
            cache
        };

        Ok(Self {
            db,
            cache,
            scope: Vec::new(),
            dirty: false,
        })
    }

    /// Flush the cache to disk in one transaction.
    ///
    /// The table is rebuilt wholesale so removals are reflected. A clean
    /// store returns immediately.
    pub fn sync(&mut self) -> Result<(), KeepsakeError> {
        if !self.dirty {
            return Ok(());
        }
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
        {
            write_txn
                .delete_table(SETTINGS)
                .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
            let mut table = write_txn
                .open_table(SETTINGS)
                .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
            for (key, value) in &self.cache {
                let bytes = postcard::to_allocvec(value)
                    .map_err(|e| KeepsakeError::SerializationError(e.to_string()))?;
                table
                    .insert(key.as_str(), bytes.as_slice())
                    .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| KeepsakeError::IoError(e.to_string()))?;
        self.dirty = false;
        Ok(())
    }

    fn resolve(&self, key: &str) -> String {
        scoped_key(&self.scope, key)
    }

    /// All entries in key order, fully-joined keys.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cache.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Remove the entry under `key` within the current scope.
    pub fn remove(&mut self, key: &str) -> bool {
        let resolved = self.resolve(key);
        let removed = self.cache.remove(&resolved).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl SettingsStore for RedbStore {
    fn set_value(&mut self, key: &str, value: Value) {
        let resolved = self.resolve(key);
        self.cache.insert(resolved, value);
        self.dirty = true;
    }

    fn value(&self, key: &str) -> Option<Value> {
        self.cache.get(&self.resolve(key)).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(&self.resolve(key))
    }

    fn begin_group(&mut self, name: &str) {
        self.scope.push(name.to_string());
    }

    fn end_group(&mut self) {
        let _ = self.scope.pop();
    }
}

impl Drop for RedbStore {
    fn drop(&mut self) {
        // Best-effort flush; explicit sync() is the error-visible path.
        let _ = self.sync();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.redb");

        {
            let mut store = RedbStore::open(&path).expect("open");
            store.begin_group("mainWindow");
            store.set_value("fontSize", Value::Int(14));
            store.end_group();
            store.set_value("theme", Value::Text("dark".into()));
            store.sync().expect("sync");
        }

        let store = RedbStore::open(&path).expect("reopen");
        assert_eq!(store.len(), 2);
        assert_eq!(store.value("mainWindow/fontSize"), Some(Value::Int(14)));
        assert_eq!(store.value("theme"), Some(Value::Text("dark".into())));
    }

    #[test]
    fn drop_flushes_dirty_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.redb");

        {
            let mut store = RedbStore::open(&path).expect("open");
            store.set_value("k", Value::Bool(true));
            // No explicit sync; Drop handles it.
        }

        let store = RedbStore::open(&path).expect("reopen");
        assert_eq!(store.value("k"), Some(Value::Bool(true)));
    }

    #[test]
    fn remove_survives_sync() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.redb");

        {
            let mut store = RedbStore::open(&path).expect("open");
            store.set_value("a", Value::Int(1));
            store.set_value("b", Value::Int(2));
            store.sync().expect("sync");
            assert!(store.remove("a"));
            store.sync().expect("sync");
        }

        let store = RedbStore::open(&path).expect("reopen");
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
    }

    #[test]
    fn structured_values_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.redb");

        {
            let mut store = RedbStore::open(&path).expect("open");
            store.set_value(
                "searchTerms.items",
                Value::List(vec!["foo".into(), "bar".into()]),
            );
            store.set_value("_geometry", Value::Blob(vec![1, 2, 3]));
            store.set_value("_position", Value::Point(30, 40));
            store.sync().expect("sync");
        }

        let store = RedbStore::open(&path).expect("reopen");
        assert_eq!(
            store.value("searchTerms.items"),
            Some(Value::List(vec!["foo".into(), "bar".into()]))
        );
        assert_eq!(store.value("_geometry"), Some(Value::Blob(vec![1, 2, 3])));
        assert_eq!(store.value("_position"), Some(Value::Point(30, 40)));
    }

    #[test]
    fn clean_sync_is_a_noop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.redb");

        let mut store = RedbStore::open(&path).expect("open");
        store.sync().expect("first sync");
        store.sync().expect("second sync");
    }
}
