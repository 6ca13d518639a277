//! The authoring session.

use crate::backup::require_unique_scene_ids;
use crate::references::resolve_references;
use crate::retry::with_transient_retry;
use crate::snapshot::{
    ActiveProject, ProjectIdAllocator, SaveMode, SnapshotBuilder, UNTITLED_PROJECT,
    persist_snapshot,
};
use crate::{MergeOutcome, Roster, prompts};
use anidirector_core::{
    Character, Clock, GenerationSettings, ImageMode, ImageRef, SavedProject, Scene, StoryConfig,
    StoryIdea, StoryboardData, WorkflowStage,
};
use anidirector_error::{AniDirectorResult, GenerationResult, NotFoundError, NotFoundErrorKind};
use anidirector_interface::{ImageQuality, ImageRequest, MediaGenerator};
use anidirector_storage::{RecordStore, load_all, replace_all_records};
use std::sync::Arc;

/// One user's authoring session over a store.
///
/// Owns the roster, the saved-project list and the active project. Every
/// mutation happens through `&mut self`, so there is exactly one writer and
/// checkpoints are totally ordered.
pub struct Studio<G: MediaGenerator> {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) generator: G,
    pub(crate) settings: GenerationSettings,
    pub(crate) snapshots: SnapshotBuilder,
    pub(crate) roster: Roster,
    pub(crate) projects: Vec<SavedProject>,
    pub(crate) active: ActiveProject,
}

impl<G: MediaGenerator> Studio<G> {
    /// Open a session, loading the roster and the saved projects.
    ///
    /// The first load of each collection runs the legacy migration.
    #[tracing::instrument(skip_all, fields(provider = generator.provider_name()))]
    pub async fn open(
        store: Arc<dyn RecordStore>,
        generator: G,
        clock: Arc<dyn Clock>,
        settings: GenerationSettings,
    ) -> AniDirectorResult<Self> {
        let roster = Roster::from_characters(load_all(store.as_ref()).await?);
        let projects: Vec<SavedProject> = load_all(store.as_ref()).await?;
        let ids = ProjectIdAllocator::seeded(projects.iter().map(|p| p.id().as_str()));

        tracing::info!(
            characters = roster.len(),
            projects = projects.len(),
            "Studio opened"
        );

        Ok(Self {
            store,
            generator,
            settings,
            snapshots: SnapshotBuilder::new(clock, ids),
            roster,
            projects,
            active: ActiveProject::default(),
        })
    }

    /// The character roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Saved projects, as last read from the store.
    pub fn projects(&self) -> &[SavedProject] {
        &self.projects
    }

    /// The project being edited.
    pub fn active(&self) -> &ActiveProject {
        &self.active
    }

    /// The active storyboard, if a plan exists.
    pub fn storyboard(&self) -> Option<&StoryboardData> {
        self.active.storyboard.as_ref()
    }

    /// Generation settings in effect.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// The generation collaborator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Start a fresh, unsaved project.
    pub fn new_project(&mut self) {
        self.active = ActiveProject::default();
    }

    /// Make a saved project the active one.
    #[tracing::instrument(skip(self))]
    pub fn load_project(&mut self, id: &str) -> AniDirectorResult<()> {
        let project = self
            .projects
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Project(id.to_string())))?;
        self.active = ActiveProject::from_saved(project);
        tracing::debug!(stage = %self.active.stage, "Project loaded");
        Ok(())
    }

    /// Replace the active story parameters.
    pub fn update_config(&mut self, config: StoryConfig) {
        self.active.config = config;
    }

    /// Overwrite the config fields an idea provides.
    pub fn apply_idea(&mut self, idea: StoryIdea) {
        self.active.config.apply_idea(idea);
    }

    /// Ask the collaborator for a story idea and apply it.
    #[tracing::instrument(skip(self))]
    pub async fn generate_idea(&mut self) -> AniDirectorResult<StoryIdea> {
        let idea = with_transient_retry(&self.settings, "generate_idea", || {
            self.generator.generate_idea()
        })
        .await?;
        self.active.config.apply_idea(idea.clone());
        Ok(idea)
    }

    /// Plan the storyboard for the active config.
    ///
    /// Scenes are laid end to end from zero. The first successful plan is
    /// where a project gets created, through a silent checkpoint. A plan that
    /// repeats a scene id is refused with a validation error and nothing
    /// changes.
    #[tracing::instrument(skip(self), fields(title = %self.active.config.title))]
    pub async fn generate_story_plan(&mut self) -> AniDirectorResult<&StoryboardData> {
        let config = self.active.config.clone();
        let mut plan = with_transient_retry(&self.settings, "generate_story_plan", || {
            self.generator.generate_storyboard_plan(&config)
        })
        .await?;
        require_unique_scene_ids(&plan)?;

        plan.assign_offsets(*self.settings.default_scene_duration_secs());
        for scene in plan.scenes_mut() {
            scene.clear_generating_flags();
        }
        tracing::info!(scenes = plan.scenes().len(), "Story plan ready");

        self.active.storyboard = Some(plan);
        self.active.stage = WorkflowStage::AssignCharacters;
        self.checkpoint().await;

        self.storyboard()
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Storyboard).into())
    }

    /// Generate a portrait and return it as an unsaved character.
    #[tracing::instrument(skip(self, description))]
    pub async fn design_character(
        &mut self,
        name: &str,
        description: &str,
    ) -> AniDirectorResult<Character> {
        let image = with_transient_retry(&self.settings, "generate_character_design", || {
            self.generator.generate_character_design(name, description)
        })
        .await?;
        Ok(Character::new(
            uuid::Uuid::new_v4().to_string(),
            name,
            description,
            Some(image),
        ))
    }

    /// Cast a character into the active story and save the project.
    ///
    /// The character is merged into the roster by name. The protagonist or
    /// secondary slot with the same name is linked to the character's id.
    #[tracing::instrument(skip(self, character), fields(name = %character.name()))]
    pub async fn confirm_casting(&mut self, character: Character) -> AniDirectorResult<SavedProject> {
        self.commit_roster_merge(character.clone()).await?;

        let config = &mut self.active.config;
        if character.name() == &config.protagonist_name {
            config.protagonist_id = Some(character.id().clone());
        }
        for secondary in config
            .secondary_characters
            .iter_mut()
            .filter(|s| &s.name == character.name())
        {
            secondary.id = Some(character.id().clone());
        }

        self.active.stage = WorkflowStage::Storyboard;
        self.save_project().await
    }

    /// Add or replace a roster character outside any project.
    #[tracing::instrument(skip(self, character), fields(name = %character.name()))]
    pub async fn save_library_character(
        &mut self,
        character: Character,
    ) -> AniDirectorResult<MergeOutcome> {
        self.commit_roster_merge(character).await
    }

    /// Remove a roster character.
    #[tracing::instrument(skip(self))]
    pub async fn delete_character(&mut self, id: &str) -> AniDirectorResult<Character> {
        let mut roster = self.roster.clone();
        let removed = roster
            .remove_by_id(id)
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Character(id.to_string())))?;
        replace_all_records(self.store.as_ref(), roster.members()).await?;
        self.roster = roster;
        tracing::info!(name = %removed.name(), "Character deleted");
        Ok(removed)
    }

    /// Save the active project. Failures are returned.
    pub async fn save_project(&mut self) -> AniDirectorResult<SavedProject> {
        self.persist(SaveMode::Explicit).await
    }

    /// Generate one scene's concept image or storyboard panel.
    #[tracing::instrument(skip(self))]
    pub async fn generate_scene_image(
        &mut self,
        scene_id: u32,
        mode: ImageMode,
        quality: ImageQuality,
    ) -> AniDirectorResult<ImageRef> {
        let request = self.begin_scene_generation(scene_id, mode, quality)?;
        let result = self.request_image(&request).await;
        self.finish_scene_generation(scene_id, mode, &result);

        let image = result?;
        self.checkpoint().await;
        Ok(image)
    }

    /// Merge a character into a copy of the roster, write it, then adopt it.
    ///
    /// On a failed write the in-memory roster is unchanged.
    async fn commit_roster_merge(&mut self, character: Character) -> AniDirectorResult<MergeOutcome> {
        let mut roster = self.roster.clone();
        let outcome = roster.merge(character);
        replace_all_records(self.store.as_ref(), roster.members()).await?;
        self.roster = roster;
        tracing::debug!(?outcome, members = self.roster.len(), "Roster updated");
        Ok(outcome)
    }

    /// Build and persist a snapshot of the active project.
    pub(crate) async fn persist(&mut self, mode: SaveMode) -> AniDirectorResult<SavedProject> {
        self.persist_as(mode, UNTITLED_PROJECT).await
    }

    #[tracing::instrument(skip(self))]
    pub(crate) async fn persist_as(
        &mut self,
        mode: SaveMode,
        fallback_name: &str,
    ) -> AniDirectorResult<SavedProject> {
        let record = self.snapshots.build(&mut self.active, &self.roster, fallback_name);
        self.projects = persist_snapshot(self.store.as_ref(), &record).await?;
        Ok(record)
    }

    /// Persist after a unit of work. Failures are logged and swallowed.
    pub(crate) async fn checkpoint(&mut self) -> Option<SavedProject> {
        match self.persist(SaveMode::Checkpoint).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(error = %e, "Checkpoint failed, continuing");
                None
            }
        }
    }

    /// Mark a scene in flight and build its image request.
    pub(crate) fn begin_scene_generation(
        &mut self,
        scene_id: u32,
        mode: ImageMode,
        quality: ImageQuality,
    ) -> AniDirectorResult<ImageRequest> {
        let scene = self.scene_mut(scene_id)?;
        scene.begin_generation(mode);
        let scene = scene.clone();
        Ok(self.image_request(&scene, mode, quality))
    }

    /// Record the outcome on the scene as it is now.
    pub(crate) fn finish_scene_generation(
        &mut self,
        scene_id: u32,
        mode: ImageMode,
        result: &GenerationResult<ImageRef>,
    ) {
        let Ok(scene) = self.scene_mut(scene_id) else {
            tracing::warn!(scene_id, "Scene vanished during generation");
            return;
        };
        match result {
            Ok(image) => scene.complete_generation(mode, image.clone()),
            Err(_) => scene.abandon_generation(mode),
        }
    }

    pub(crate) async fn request_image(&self, request: &ImageRequest) -> GenerationResult<ImageRef> {
        with_transient_retry(&self.settings, "generate_image", || {
            self.generator.generate_image(request)
        })
        .await
    }

    fn image_request(&self, scene: &Scene, mode: ImageMode, quality: ImageQuality) -> ImageRequest {
        let config = &self.active.config;
        let prompt = match mode {
            ImageMode::Concept => scene.visual_description().clone(),
            ImageMode::Storyboard => prompts::storyboard_panel_prompt(scene, &config.setting),
        };
        let (images, descriptions) = resolve_references(
            scene,
            &self.roster,
            config,
            *self.settings.max_reference_images(),
        )
        .into_parts();
        ImageRequest::new(prompt, config.aspect_ratio, mode, quality)
            .with_references(images, descriptions)
    }

    fn scene_mut(&mut self, scene_id: u32) -> AniDirectorResult<&mut Scene> {
        let storyboard = self
            .active
            .storyboard
            .as_mut()
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Storyboard))?;
        storyboard
            .scene_mut(scene_id)
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Scene(scene_id)).into())
    }
}
