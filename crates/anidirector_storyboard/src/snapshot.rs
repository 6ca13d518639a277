//! Point-in-time project records.

use crate::Roster;
use anidirector_core::{Clock, SavedProject, StoryConfig, StoryboardData, WorkflowStage};
use anidirector_error::AniDirectorResult;
use anidirector_storage::{RecordStore, load_all, upsert_record};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Name given to snapshots of untitled projects.
pub const UNTITLED_PROJECT: &str = "Untitled";

/// The project being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveProject {
    /// Assigned at first persistence
    pub id: Option<String>,
    /// Narrative parameters
    pub config: StoryConfig,
    /// Storyboard, once a plan exists
    pub storyboard: Option<StoryboardData>,
    /// Workflow stage shown to the user
    pub stage: WorkflowStage,
}

impl ActiveProject {
    /// Rebuild the active project from a saved record.
    ///
    /// In-flight flags from an interrupted run are cleared.
    pub fn from_saved(project: SavedProject) -> Self {
        let id = project.id().clone();
        let (config, mut storyboard, stage) = project.into_parts();
        if let Some(storyboard) = storyboard.as_mut() {
            for scene in storyboard.scenes_mut() {
                scene.clear_generating_flags();
            }
        }
        Self {
            id: Some(id),
            config,
            storyboard,
            stage,
        }
    }
}

/// Whether a failed write is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SaveMode {
    /// User-initiated; failures are returned
    Explicit,
    /// Automatic after a unit of work; failures are logged and swallowed
    Checkpoint,
}

/// Hands out project ids derived from the clock's millisecond timestamp.
///
/// Ids strictly increase within a process even when the clock stalls or
/// steps backwards.
#[derive(Debug, Clone, Default)]
pub struct ProjectIdAllocator {
    last: i64,
}

impl ProjectIdAllocator {
    /// Start above every numeric id already in use.
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let last = existing
            .into_iter()
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or_default();
        Self { last }
    }

    /// Allocate an id for `now`.
    pub fn allocate(&mut self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis().max(self.last + 1);
        self.last = millis;
        millis.to_string()
    }
}

/// Builds [`SavedProject`] records from the active project and the roster.
pub struct SnapshotBuilder {
    clock: Arc<dyn Clock>,
    ids: ProjectIdAllocator,
}

impl SnapshotBuilder {
    /// Create a builder.
    pub fn new(clock: Arc<dyn Clock>, ids: ProjectIdAllocator) -> Self {
        Self { clock, ids }
    }

    /// The clock stamping records.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Build a record of the active project.
    ///
    /// Allocates the project id on first build. `characters` is the roster's
    /// used-by selection for the config, computed now. The roster is only read.
    /// Untitled projects are named `fallback_name`.
    pub fn build(
        &mut self,
        active: &mut ActiveProject,
        roster: &Roster,
        fallback_name: &str,
    ) -> SavedProject {
        let now = self.clock.now();
        let id = match &active.id {
            Some(id) => id.clone(),
            None => {
                let id = self.ids.allocate(now);
                tracing::debug!(project_id = %id, "Allocated project id");
                active.id = Some(id.clone());
                id
            }
        };

        let name = if active.config.title.trim().is_empty() {
            fallback_name.to_string()
        } else {
            active.config.title.clone()
        };

        SavedProject::new(
            id,
            name,
            now,
            roster.used_by(&active.config),
            active.config.clone(),
            active.storyboard.clone(),
            WorkflowStage::for_snapshot(active.storyboard.is_some()),
        )
    }
}

/// Upsert a record, then reload the full project list from the store.
#[tracing::instrument(skip(store, record), fields(project_id = %record.id()))]
pub async fn persist_snapshot(
    store: &dyn RecordStore,
    record: &SavedProject,
) -> AniDirectorResult<Vec<SavedProject>> {
    upsert_record(store, record).await?;
    let projects = load_all(store).await?;
    tracing::debug!(projects = projects.len(), "Project snapshot persisted");
    Ok(projects)
}
