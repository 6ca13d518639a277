//! Record keys, in-place upserts and legacy blob import shared by backends.

use crate::Collection;
use anidirector_error::{AniDirectorResult, PersistenceError, PersistenceErrorKind};
use serde_json::Value;

/// The key of a record: its `id` field, as a string.
///
/// Numeric ids from older saves are keyed by their decimal form.
pub fn record_key(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

pub(crate) fn require_key(collection: Collection, record: &Value) -> AniDirectorResult<String> {
    record_key(record).ok_or_else(|| {
        PersistenceError::new(PersistenceErrorKind::Write(format!(
            "{collection} record has no id"
        )))
        .into()
    })
}

/// Replace the record with the same key in place, or append it.
pub(crate) fn upsert_in_place(records: &mut Vec<Value>, key: &str, record: Value) {
    match records
        .iter_mut()
        .find(|existing| record_key(existing).as_deref() == Some(key))
    {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Validate and key a full-replace list. Duplicate ids keep the later record.
pub(crate) fn keyed_list(
    collection: Collection,
    records: Vec<Value>,
) -> AniDirectorResult<Vec<Value>> {
    let mut keyed = Vec::with_capacity(records.len());
    for record in records {
        let key = require_key(collection, &record)?;
        upsert_in_place(&mut keyed, &key, record);
    }
    Ok(keyed)
}

/// Decode a legacy blob into records ready for the structured collection.
pub(crate) fn import_legacy_blob(
    collection: Collection,
    blob: &[u8],
) -> Result<Vec<Value>, PersistenceError> {
    let entries: Vec<Value> = serde_json::from_slice(blob).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Migration(format!(
            "{}: {}",
            collection.legacy_blob_name(),
            e
        )))
    })?;
    Ok(key_legacy_entries(collection, entries))
}

/// Key legacy entries for import. Entries without an id cannot be keyed
/// and are skipped.
pub(crate) fn key_legacy_entries(collection: Collection, entries: Vec<Value>) -> Vec<Value> {
    let mut imported = Vec::with_capacity(entries.len());
    for entry in entries {
        match record_key(&entry) {
            Some(key) => upsert_in_place(&mut imported, &key, entry),
            None => tracing::warn!(%collection, "Skipping legacy entry without an id"),
        }
    }
    imported
}
