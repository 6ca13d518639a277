//! Portable backup export and restore.

use crate::Studio;
use crate::snapshot::SaveMode;
use anidirector_core::{BackupDocument, SavedProject, StoryboardData, WorkflowStage};
use anidirector_error::{
    AniDirectorResult, JsonError, NotFoundError, NotFoundErrorKind, PersistenceError,
    PersistenceErrorKind, ValidationError, ValidationErrorKind,
};
use anidirector_interface::MediaGenerator;
use anidirector_storage::replace_all_records;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::Path;

/// Name given to projects created by a restore with no title.
pub const RESTORED_PROJECT: &str = "Restored project";

const REQUIRED_FIELDS: [&str; 3] = ["storyConfig", "characters", "storyboard"];

/// Parse and validate a backup document.
///
/// # Errors
///
/// - [`ValidationErrorKind::Malformed`] if the text is not JSON
/// - [`ValidationErrorKind::MissingField`] if a payload field is absent or null
/// - [`ValidationErrorKind::UnsupportedShape`] if a field has the wrong shape
///   or two scenes share an id
pub fn parse_backup(text: &str) -> Result<BackupDocument, ValidationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ValidationError::new(ValidationErrorKind::Malformed(e.to_string())))?;

    let Some(object) = value.as_object() else {
        return Err(ValidationError::new(ValidationErrorKind::UnsupportedShape(
            "backup must be a JSON object".to_string(),
        )));
    };
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|field| object.get(**field).is_none_or(Value::is_null))
    {
        return Err(ValidationError::new(ValidationErrorKind::MissingField(
            (*missing).to_string(),
        )));
    }

    let document: BackupDocument = serde_json::from_value(value)
        .map_err(|e| ValidationError::new(ValidationErrorKind::UnsupportedShape(e.to_string())))?;
    require_unique_scene_ids(document.storyboard())?;
    Ok(document)
}

/// Reject a storyboard in which two scenes share an id.
pub(crate) fn require_unique_scene_ids(
    storyboard: &StoryboardData,
) -> Result<(), ValidationError> {
    match storyboard.duplicate_scene_id() {
        Some(id) => Err(ValidationError::new(ValidationErrorKind::UnsupportedShape(
            format!("scene id {id} appears more than once"),
        ))),
        None => Ok(()),
    }
}

/// Read and validate a backup file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn read_backup_file(path: impl AsRef<Path>) -> AniDirectorResult<BackupDocument> {
    let text = tokio::fs::read_to_string(path.as_ref()).await.map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Read(format!(
            "{}: {}",
            path.as_ref().display(),
            e
        )))
    })?;
    Ok(parse_backup(&text)?)
}

/// Write a backup as pretty-printed JSON.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn write_backup_file(
    path: impl AsRef<Path>,
    document: &BackupDocument,
) -> AniDirectorResult<()> {
    let json = serde_json::to_string_pretty(document).map_err(|e| JsonError::new(e.to_string()))?;
    tokio::fs::write(path.as_ref(), json).await.map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Write(format!(
            "{}: {}",
            path.as_ref().display(),
            e
        )))
    })?;
    tracing::info!("Backup written");
    Ok(())
}

/// Suggested file name: `{title}_backup_{YYYY-MM-DD}.json`.
pub fn backup_file_name(title: &str, date: DateTime<Utc>) -> String {
    let title = title.trim();
    let stem: String = if title.is_empty() {
        "storyboard".to_string()
    } else {
        title
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect()
    };
    format!("{}_backup_{}.json", stem, date.format("%Y-%m-%d"))
}

impl<G: MediaGenerator> Studio<G> {
    /// Bundle the active config, the roster and the storyboard.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when the active project has no storyboard.
    pub fn export_backup(&self) -> AniDirectorResult<BackupDocument> {
        let storyboard = self
            .active
            .storyboard
            .clone()
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Storyboard))?;
        Ok(BackupDocument::new(
            self.snapshots.clock().now(),
            self.active.config.clone(),
            self.roster.members().to_vec(),
            storyboard,
        ))
    }

    /// Restore a backup as a new project.
    ///
    /// Characters are merged into the roster by name, in bundle order, and the
    /// roster is written before anything in memory changes. The bundle's
    /// config and storyboard then replace the active ones and a snapshot is
    /// saved under a fresh id. The project that was active before is left as
    /// it was in the store.
    #[tracing::instrument(skip_all, fields(title = %document.story_config().title))]
    pub async fn restore_backup(
        &mut self,
        document: BackupDocument,
    ) -> AniDirectorResult<SavedProject> {
        require_unique_scene_ids(document.storyboard())?;
        let (config, characters, mut storyboard) = document.into_payload();

        let mut roster = self.roster.clone();
        roster.merge_all(characters);
        replace_all_records(self.store.as_ref(), roster.members()).await?;
        self.roster = roster;

        for scene in storyboard.scenes_mut() {
            scene.clear_generating_flags();
        }
        self.active.id = None;
        self.active.config = config;
        self.active.storyboard = Some(storyboard);
        self.active.stage = WorkflowStage::Storyboard;

        let record = self.persist_as(SaveMode::Explicit, RESTORED_PROJECT).await?;
        tracing::info!(project_id = %record.id(), "Backup restored");
        Ok(record)
    }
}
