//! Filesystem-backed record store.
//!
//! Each collection lives in one pretty-printed JSON array:
//!
//! ```text
//! {base_path}/
//! ├── characters.json
//! ├── projects.json
//! └── mv_director_characters.json   (legacy blob, removed after migration)
//! ```
//!
//! Writes go to a temp file that is renamed over the collection file, so a
//! reader never observes a half-written collection. Operations on one store
//! are serialized by an async mutex.

use crate::migration::{import_legacy_blob, keyed_list, require_key, upsert_in_place};
use crate::{Collection, RecordStore};
use anidirector_error::{AniDirectorResult, PersistenceError, PersistenceErrorKind};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Filesystem store backend.
#[derive(Debug)]
pub struct FileSystemStore {
    base_path: PathBuf,
    lock: Mutex<()>,
}

impl FileSystemStore {
    /// Open a store rooted at `base_path`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> AniDirectorResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened filesystem store");
        Ok(Self {
            base_path,
            lock: Mutex::new(()),
        })
    }

    /// Root directory of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File holding a collection.
    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.base_path.join(format!("{collection}.json"))
    }

    /// File holding a collection's legacy single-blob list.
    pub fn legacy_blob_path(&self, collection: Collection) -> PathBuf {
        self.base_path
            .join(format!("{}.json", collection.legacy_blob_name()))
    }

    async fn read_collection(&self, collection: Collection) -> AniDirectorResult<Vec<Value>> {
        let path = self.collection_path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(io_failure(PersistenceErrorKind::Read, &path, &e).into());
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Corrupt(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    async fn write_collection(
        &self,
        collection: Collection,
        records: &[Value],
    ) -> AniDirectorResult<()> {
        let path = self.collection_path(collection);
        let bytes = serde_json::to_vec_pretty(records).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Write(format!(
                "encode {collection}: {e}"
            )))
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &bytes)
            .await
            .map_err(|e| io_failure(PersistenceErrorKind::Write, &temp_path, &e))?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Transaction(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(%collection, records = records.len(), "Wrote collection");
        Ok(())
    }

    /// Import the legacy blob into an empty collection.
    ///
    /// Returns the imported records, or an empty list when there is nothing
    /// to import. An undecodable blob is logged and left in place.
    async fn migrate_legacy(&self, collection: Collection) -> AniDirectorResult<Vec<Value>> {
        let blob_path = self.legacy_blob_path(collection);
        let blob = match tokio::fs::read(&blob_path).await {
            Ok(blob) => blob,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_failure(PersistenceErrorKind::Read, &blob_path, &e).into()),
        };

        let imported = match import_legacy_blob(collection, &blob) {
            Ok(imported) => imported,
            Err(e) => {
                tracing::error!(error = %e, %collection, "Legacy blob unreadable, leaving it in place");
                return Ok(Vec::new());
            }
        };
        if imported.is_empty() {
            return Ok(imported);
        }

        self.write_collection(collection, &imported).await?;
        tokio::fs::remove_file(&blob_path).await.map_err(|e| {
            io_failure(PersistenceErrorKind::Migration, &blob_path, &e)
        })?;

        tracing::info!(%collection, records = imported.len(), "Migrated legacy blob");
        Ok(imported)
    }
}

fn io_failure(
    kind: fn(String) -> PersistenceErrorKind,
    path: &Path,
    error: &std::io::Error,
) -> PersistenceError {
    let message = format!("{}: {}", path.display(), error);
    match error.kind() {
        ErrorKind::PermissionDenied | ErrorKind::NotFound => {
            PersistenceError::new(PersistenceErrorKind::Unavailable(message))
        }
        _ => PersistenceError::new(kind(message)),
    }
}

#[async_trait::async_trait]
impl RecordStore for FileSystemStore {
    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn get_all(&self, collection: Collection) -> AniDirectorResult<Vec<Value>> {
        let _guard = self.lock.lock().await;

        let records = self.read_collection(collection).await?;
        if !records.is_empty() {
            return Ok(records);
        }
        self.migrate_legacy(collection).await
    }

    #[tracing::instrument(skip(self, record), fields(path = %self.base_path.display()))]
    async fn upsert(&self, collection: Collection, record: Value) -> AniDirectorResult<()> {
        let key = require_key(collection, &record)?;
        let _guard = self.lock.lock().await;

        let mut records = self.read_collection(collection).await?;
        upsert_in_place(&mut records, &key, record);
        self.write_collection(collection, &records).await?;

        tracing::debug!(%collection, id = %key, "Upserted record");
        Ok(())
    }

    #[tracing::instrument(skip(self, records), fields(path = %self.base_path.display(), count = records.len()))]
    async fn replace_all(
        &self,
        collection: Collection,
        records: Vec<Value>,
    ) -> AniDirectorResult<()> {
        let records = keyed_list(collection, records)?;
        let _guard = self.lock.lock().await;
        self.write_collection(collection, &records).await
    }

    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn clear(&self, collection: Collection) -> AniDirectorResult<()> {
        let _guard = self.lock.lock().await;
        self.write_collection(collection, &[]).await
    }
}
