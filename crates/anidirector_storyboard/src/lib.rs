//! Project persistence and batch generation for anidirector.
//!
//! [`Studio`] is the authoring session. It owns the character [`Roster`],
//! the saved-project list and the active project, and drives a
//! [`MediaGenerator`](anidirector_interface::MediaGenerator) through them:
//!
//! - casting, library edits and backup restores merge characters by name
//!   ([`match_key`]), replacing in place, last write wins
//! - snapshots record the roster members the story actually uses and are
//!   upserted by project id, then the project list is reloaded from the store
//! - [`Studio::generate_concept_images`] walks scenes one at a time,
//!   checkpointing after each success and isolating each failure
//! - backups are validated in full before any state changes
//!
//! # Example
//!
//! ```rust,no_run
//! use anidirector_core::{GenerationSettings, SystemClock};
//! use anidirector_storage::InMemoryStore;
//! use anidirector_storyboard::{NoopObserver, SceneFilter, Studio};
//! use anidirector_interface::{ImageQuality, MediaGenerator};
//! use std::sync::Arc;
//!
//! # async fn example<G: MediaGenerator>(generator: G) -> anidirector_error::AniDirectorResult<()> {
//! let mut studio = Studio::open(
//!     Arc::new(InMemoryStore::new()),
//!     generator,
//!     Arc::new(SystemClock),
//!     GenerationSettings::default(),
//! )
//! .await?;
//!
//! studio.generate_idea().await?;
//! studio.generate_story_plan().await?;
//! let report = studio
//!     .generate_concept_images(SceneFilter::All, ImageQuality::Standard, &NoopObserver)
//!     .await?;
//! println!("{} images, {} failures", report.succeeded().len(), report.failed().len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod batch;
mod prompts;
mod references;
mod retry;
mod roster;
mod snapshot;
mod studio;

pub use backup::{
    RESTORED_PROJECT, backup_file_name, parse_backup, read_backup_file, write_backup_file,
};
pub use batch::{
    BatchEvent, BatchObserver, BatchPhase, BatchReport, NoopObserver, SceneFailure, SceneFilter,
    SceneStatus,
};
pub use prompts::storyboard_panel_prompt;
pub use references::{SceneReferences, resolve_references};
pub use retry::with_transient_retry;
pub use roster::{MergeOutcome, Roster, match_key};
pub use snapshot::{
    ActiveProject, ProjectIdAllocator, SaveMode, SnapshotBuilder, UNTITLED_PROJECT,
    persist_snapshot,
};
pub use studio::Studio;
