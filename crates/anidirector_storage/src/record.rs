//! Typed access to the JSON collections.

use crate::{Collection, RecordStore};
use anidirector_core::{Character, SavedProject};
use anidirector_error::{AniDirectorResult, JsonError, PersistenceError, PersistenceErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A type persisted in one of the store's collections.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the type lives in.
    const COLLECTION: Collection;
}

impl Record for Character {
    const COLLECTION: Collection = Collection::Characters;
}

impl Record for SavedProject {
    const COLLECTION: Collection = Collection::Projects;
}

/// Load and decode every record of `T`'s collection.
///
/// # Errors
///
/// Fails as a whole if any record does not decode; never returns a partial list.
pub async fn load_all<T: Record>(store: &dyn RecordStore) -> AniDirectorResult<Vec<T>> {
    let values = store.get_all(T::COLLECTION).await?;
    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let record = serde_json::from_value(value).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Corrupt(format!(
                "{} record {}: {}",
                T::COLLECTION,
                index,
                e
            )))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Insert or replace one record by id.
pub async fn upsert_record<T: Record>(store: &dyn RecordStore, record: &T) -> AniDirectorResult<()> {
    let value = serde_json::to_value(record).map_err(|e| JsonError::new(e.to_string()))?;
    store.upsert(T::COLLECTION, value).await
}

/// Rewrite `T`'s whole collection from `records`.
pub async fn replace_all_records<T: Record>(
    store: &dyn RecordStore,
    records: &[T],
) -> AniDirectorResult<()> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| JsonError::new(e.to_string()))?;
    store.replace_all(T::COLLECTION, values).await
}
