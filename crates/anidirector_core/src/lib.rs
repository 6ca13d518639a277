//! Core data model for the anidirector storyboard workspace.
//!
//! Characters, story parameters, scenes, storyboards, saved projects and
//! backup documents, plus the [`Clock`] seam, [`GenerationSettings`] and the
//! tracing bootstrap shared by every crate.
//!
//! Records serialize with camelCase keys and accept the legacy key names of
//! earlier saves, so migrated blobs and old backups decode unchanged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod clock;
mod image;
mod project;
mod scene;
mod settings;
mod story;
mod telemetry;

pub use character::{Character, CharacterBuilder};
pub use clock::{Clock, SystemClock};
pub use image::ImageRef;
pub use project::{
    BACKUP_FORMAT_VERSION, BackupDocument, SavedProject, SavedProjectBuilder, WorkflowStage,
};
pub use scene::{Act, ImageMode, Scene, SceneBuilder, StoryboardData};
pub use settings::{GenerationSettings, GenerationSettingsBuilder};
pub use story::{AspectRatio, SecondaryCharacter, StoryConfig, StoryIdea};
pub use telemetry::{LogFormat, init_tracing};
