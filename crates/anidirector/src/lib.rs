//! Anidirector - storyboard studio for short 3D animated films
//!
//! Anidirector keeps a durable character roster and a list of saved projects,
//! plans a storyboard for a rescue story through a generative-media service,
//! and fills the storyboard with concept images in a resumable batch that
//! checkpoints after every finished scene.
//!
//! # Features
//!
//! - **Character roster**: characters are matched by name across projects
//! - **Project snapshots**: stable ids, last-write-wins saves
//! - **Resumable batches**: one failing scene never aborts a run, and an
//!   interrupted run keeps every image already checkpointed
//! - **Backups**: versioned JSON bundles of a project and its characters
//! - **Rate limiting**: provider quotas from layered configuration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use anidirector::{
//!     AniDirectorConfig, FileSystemStore, ImageQuality, NoopObserver, OfflineGenerator,
//!     SceneFilter, Studio, SystemClock,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AniDirectorConfig::load()?;
//!     let store = Arc::new(FileSystemStore::new(config.storage.resolve_data_dir()?)?);
//!     let studio = Studio::open(
//!         store,
//!         OfflineGenerator,
//!         Arc::new(SystemClock),
//!         config.generation.clone(),
//!     )
//!     .await?;
//!
//!     for project in studio.projects() {
//!         println!("{} {}", project.id(), project.name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` (default) - Google Gemini media provider
//! - `api` - run tests that call the live provider
//!
//! # Architecture
//!
//! - `anidirector_error` - Error types
//! - `anidirector_core` - Data model, clock, settings, tracing bootstrap
//! - `anidirector_interface` - `MediaGenerator` trait
//! - `anidirector_storage` - Record store backends and legacy migration
//! - `anidirector_rate_limit` - Configuration and provider rate limiting
//! - `anidirector_models` - Provider implementations
//! - `anidirector_storyboard` - Roster, snapshots, batches, backups, `Studio`
//!
//! This crate (`anidirector`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod offline;

pub use offline::OfflineGenerator;

// Re-export core crates (always available)
pub use anidirector_core::*;
pub use anidirector_error::*;
pub use anidirector_interface::*;
pub use anidirector_rate_limit::*;
pub use anidirector_storage::{
    Collection, FileSystemStore, InMemoryStore, Record, RecordStore, load_all, record_key,
    replace_all_records, upsert_record,
};
pub use anidirector_storyboard::*;

// Re-export providers (feature-gated)
#[cfg(feature = "gemini")]
pub use anidirector_models::GeminiClient;
