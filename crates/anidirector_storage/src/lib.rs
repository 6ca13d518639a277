//! Durable collections for the anidirector workspace.
//!
//! Two named collections, `characters` and `projects`, each keyed by the
//! record's `id` field. Backends implement [`RecordStore`]:
//!
//! - [`FileSystemStore`]: one JSON file per collection, written atomically
//! - [`InMemoryStore`]: process-local, for tests and throwaway sessions
//!
//! On the first read of an empty collection, a backend imports the legacy
//! single-blob list stored under [`Collection::legacy_blob_name`] and deletes
//! the blob. Re-running on a migrated store is a no-op because the
//! collection is no longer empty.
//!
//! # Example
//!
//! ```rust
//! use anidirector_core::Character;
//! use anidirector_storage::{FileSystemStore, load_all, replace_all_records};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemStore::new("/tmp/anidirector-doc")?;
//! let roster = vec![Character::new("c1", "Tico", "small grey mouse", None)];
//! replace_all_records(&store, &roster).await?;
//!
//! let loaded: Vec<Character> = load_all(&store).await?;
//! assert_eq!(loaded, roster);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use anidirector_error::AniDirectorResult;
use serde_json::Value;

mod filesystem;
mod memory;
mod migration;
mod record;

pub use anidirector_error::{PersistenceError, PersistenceErrorKind};
pub use filesystem::FileSystemStore;
pub use memory::InMemoryStore;
pub use migration::record_key;
pub use record::{Record, load_all, replace_all_records, upsert_record};

/// The two durable collections.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
    /// Project-independent character roster
    Characters,
    /// Saved project snapshots
    Projects,
}

impl Collection {
    /// Name of the pre-migration flat list for this collection.
    pub fn legacy_blob_name(&self) -> &'static str {
        match self {
            Collection::Characters => "mv_director_characters",
            Collection::Projects => "mv_director_projects",
        }
    }
}

/// Trait for durable record collections.
///
/// Records are JSON objects keyed by their `id` field (see [`record_key`]).
/// Every operation is atomic with respect to readers in the same process:
/// a reader sees the collection either before or after a write, never a mix.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Return every record in the collection, in insertion order.
    ///
    /// Runs the one-time legacy migration when the collection is empty.
    async fn get_all(&self, collection: Collection) -> AniDirectorResult<Vec<Value>>;

    /// Insert a record, or replace the record with the same id in place.
    async fn upsert(&self, collection: Collection, record: Value) -> AniDirectorResult<()>;

    /// Clear the collection and rewrite it from `records` in one step.
    ///
    /// Records missing from `records` are deleted.
    async fn replace_all(&self, collection: Collection, records: Vec<Value>)
    -> AniDirectorResult<()>;

    /// Remove every record from the collection.
    async fn clear(&self, collection: Collection) -> AniDirectorResult<()>;
}
