//! Process-local record store.

use crate::migration::{key_legacy_entries, keyed_list, require_key, upsert_in_place};
use crate::{Collection, RecordStore};
use anidirector_error::{AniDirectorResult, PersistenceError, PersistenceErrorKind};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    collections: HashMap<Collection, Vec<Value>>,
    legacy_blobs: HashMap<Collection, Vec<Value>>,
}

/// In-memory store with the same semantics as [`FileSystemStore`](crate::FileSystemStore),
/// including legacy migration. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a legacy single-blob list for `collection`.
    pub fn with_legacy_blob(self, collection: Collection, entries: Vec<Value>) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.legacy_blobs.insert(collection, entries);
        }
        self
    }

    /// The legacy blob for `collection`, if it has not been migrated.
    pub fn legacy_blob(&self, collection: Collection) -> Option<Vec<Value>> {
        self.tables
            .lock()
            .ok()
            .and_then(|tables| tables.legacy_blobs.get(&collection).cloned())
    }

    fn tables(&self) -> AniDirectorResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Unavailable(format!(
                "store lock poisoned: {e}"
            )))
            .into()
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryStore {
    async fn get_all(&self, collection: Collection) -> AniDirectorResult<Vec<Value>> {
        let mut tables = self.tables()?;
        let existing = tables
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_default();
        if !existing.is_empty() {
            return Ok(existing);
        }

        let Some(blob) = tables.legacy_blobs.get(&collection).cloned() else {
            return Ok(existing);
        };
        let imported = key_legacy_entries(collection, blob);
        if imported.is_empty() {
            return Ok(imported);
        }

        tables.collections.insert(collection, imported.clone());
        tables.legacy_blobs.remove(&collection);
        tracing::info!(%collection, records = imported.len(), "Migrated legacy blob");
        Ok(imported)
    }

    async fn upsert(&self, collection: Collection, record: Value) -> AniDirectorResult<()> {
        let key = require_key(collection, &record)?;
        let mut tables = self.tables()?;
        let records = tables.collections.entry(collection).or_default();
        upsert_in_place(records, &key, record);
        Ok(())
    }

    async fn replace_all(
        &self,
        collection: Collection,
        records: Vec<Value>,
    ) -> AniDirectorResult<()> {
        let records = keyed_list(collection, records)?;
        self.tables()?.collections.insert(collection, records);
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> AniDirectorResult<()> {
        self.tables()?.collections.remove(&collection);
        Ok(())
    }
}
