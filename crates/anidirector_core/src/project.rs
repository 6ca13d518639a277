//! Saved projects, workflow stage and backup documents.

use crate::{Character, StoryConfig, StoryboardData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a project sits in the authoring workflow.
///
/// Serialized by name. Older saves stored the stage as `0`, `1` or `2`,
/// which still decode.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case", try_from = "StageRepr")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowStage {
    /// Story parameters are being edited
    #[default]
    SetupStory,
    /// A story plan exists and characters are being cast
    AssignCharacters,
    /// Storyboard frames are being produced
    Storyboard,
}

impl WorkflowStage {
    /// The stage a snapshot records, derived from whether a storyboard exists.
    pub fn for_snapshot(has_storyboard: bool) -> Self {
        if has_storyboard {
            WorkflowStage::Storyboard
        } else {
            WorkflowStage::SetupStory
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StageRepr {
    Index(u8),
    Name(String),
}

impl TryFrom<StageRepr> for WorkflowStage {
    type Error = String;

    fn try_from(repr: StageRepr) -> Result<Self, Self::Error> {
        match repr {
            StageRepr::Index(0) => Ok(WorkflowStage::SetupStory),
            StageRepr::Index(1) => Ok(WorkflowStage::AssignCharacters),
            StageRepr::Index(2) => Ok(WorkflowStage::Storyboard),
            StageRepr::Index(n) => Err(format!("unknown workflow stage {n}")),
            StageRepr::Name(name) => name
                .parse()
                .map_err(|_| format!("unknown workflow stage {name}")),
        }
    }
}

/// A persisted point-in-time copy of one project.
///
/// A record replaces any earlier record with the same `id` wholesale.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct SavedProject {
    /// Assigned at first persistence, never reassigned
    id: String,
    /// Display name
    name: String,
    /// Refreshed on every write
    updated_at: DateTime<Utc>,
    /// Roster members the story uses, as of this snapshot
    #[builder(default)]
    #[serde(default)]
    characters: Vec<Character>,
    /// Narrative parameters
    #[builder(default)]
    #[serde(default)]
    story_config: StoryConfig,
    /// Storyboard, once a plan exists
    #[builder(default)]
    #[serde(default)]
    storyboard_data: Option<StoryboardData>,
    /// Workflow stage
    #[builder(default)]
    #[serde(default, alias = "step")]
    stage: WorkflowStage,
}

impl SavedProject {
    /// Creates a new saved project builder.
    pub fn builder() -> SavedProjectBuilder {
        SavedProjectBuilder::default()
    }

    /// Assemble a record from its parts.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        updated_at: DateTime<Utc>,
        characters: Vec<Character>,
        story_config: StoryConfig,
        storyboard_data: Option<StoryboardData>,
        stage: WorkflowStage,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            updated_at,
            characters,
            story_config,
            storyboard_data,
            stage,
        }
    }

    /// Break the record into its parts.
    pub fn into_parts(self) -> (StoryConfig, Option<StoryboardData>, WorkflowStage) {
        (self.story_config, self.storyboard_data, self.stage)
    }
}

/// Interchange format version written by this release.
pub const BACKUP_FORMAT_VERSION: &str = "1.0";

/// A portable, self-contained project backup.
///
/// Independent of any store identifiers: restoring always produces a new
/// project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    /// Format version
    #[serde(default = "default_version")]
    version: String,
    /// When the backup was written
    #[serde(default)]
    export_date: DateTime<Utc>,
    /// Narrative parameters
    story_config: StoryConfig,
    /// Roster at export time
    characters: Vec<Character>,
    /// Storyboard at export time
    storyboard: StoryboardData,
}

fn default_version() -> String {
    BACKUP_FORMAT_VERSION.to_string()
}

impl BackupDocument {
    /// Assemble a backup stamped with the current format version.
    pub fn new(
        export_date: DateTime<Utc>,
        story_config: StoryConfig,
        characters: Vec<Character>,
        storyboard: StoryboardData,
    ) -> Self {
        Self {
            version: default_version(),
            export_date,
            story_config,
            characters,
            storyboard,
        }
    }

    /// Break the document into its three payload fields.
    pub fn into_payload(self) -> (StoryConfig, Vec<Character>, StoryboardData) {
        (self.story_config, self.characters, self.storyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_decodes_names_and_legacy_indices() {
        let stages: Vec<WorkflowStage> =
            serde_json::from_str(r#"[0, 1, 2, "storyboard", "assign_characters"]"#).unwrap();
        assert_eq!(
            stages,
            vec![
                WorkflowStage::SetupStory,
                WorkflowStage::AssignCharacters,
                WorkflowStage::Storyboard,
                WorkflowStage::Storyboard,
                WorkflowStage::AssignCharacters,
            ]
        );
        assert_eq!(
            serde_json::to_string(&WorkflowStage::SetupStory).unwrap(),
            r#""setup_story""#
        );
    }

    #[test]
    fn legacy_project_record_decodes() {
        let json = r#"{
            "id": "1717000000000",
            "name": "Rails",
            "updatedAt": "2024-05-29T16:26:40.000Z",
            "characters": [{"id": "c1", "name": "Tico", "description": "", "imageUrl": null}],
            "storyConfig": {"title": "Rails"},
            "storyboardData": null,
            "step": 2
        }"#;
        let project: SavedProject = serde_json::from_str(json).unwrap();
        assert_eq!(project.id(), "1717000000000");
        assert_eq!(*project.stage(), WorkflowStage::Storyboard);
        assert!(project.storyboard_data().is_none());
    }
}
