//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the anidirector binary.

mod backup;
mod commands;
mod generate;
mod library;

pub use backup::{export_project, import_backup};
pub use commands::{Cli, Commands, OutputFormat};
pub use generate::generate_concept_images;
pub use library::{list_characters, list_projects};

use anidirector::{
    AniDirectorConfig, AniDirectorResult, FileSystemStore, MediaGenerator, RecordStore, Studio,
    SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration and store shared by every command.
pub struct Session {
    config: AniDirectorConfig,
    store: Arc<dyn RecordStore>,
}

impl Session {
    /// Load configuration and open the store.
    pub fn open(data_dir: Option<PathBuf>) -> AniDirectorResult<Self> {
        let config = AniDirectorConfig::load()?;
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config.storage.resolve_data_dir()?,
        };
        tracing::debug!(data_dir = %data_dir.display(), "Opening store");
        let store = Arc::new(FileSystemStore::new(data_dir)?);
        Ok(Self { config, store })
    }

    /// Loaded configuration.
    #[cfg_attr(not(feature = "gemini"), allow(dead_code))]
    pub fn config(&self) -> &AniDirectorConfig {
        &self.config
    }

    /// Open a studio over the store with `generator`.
    pub async fn studio<G: MediaGenerator>(&self, generator: G) -> AniDirectorResult<Studio<G>> {
        Studio::open(
            self.store.clone(),
            generator,
            Arc::new(SystemClock),
            self.config.generation.clone(),
        )
        .await
    }
}
