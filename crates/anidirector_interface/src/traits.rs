//! The external generation collaborator.

use crate::ImageRequest;
use anidirector_core::{ImageRef, StoryConfig, StoryIdea, StoryboardData};
use anidirector_error::GenerationResult;
use async_trait::async_trait;

/// A generative-media service that produces story ideas, story plans and images.
///
/// Every call is safe to repeat from the caller's side, though the service
/// may answer differently each time. Failures are classified as transient or
/// permanent through [`GenerationError`](anidirector_error::GenerationError);
/// timeouts are the implementation's responsibility and surface as transient
/// errors.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Suggest story parameters. Any field may be absent.
    async fn generate_idea(&self) -> GenerationResult<StoryIdea>;

    /// Plan the storyboard scenes for a story.
    ///
    /// Start offsets in the returned scenes are not trusted; the caller lays
    /// scenes out itself.
    async fn generate_storyboard_plan(&self, config: &StoryConfig)
    -> GenerationResult<StoryboardData>;

    /// Produce a portrait for a character.
    async fn generate_character_design(
        &self,
        name: &str,
        description: &str,
    ) -> GenerationResult<ImageRef>;

    /// Produce a scene image.
    async fn generate_image(&self, request: &ImageRequest) -> GenerationResult<ImageRef>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}
