//! A generator for builds and sessions without a media provider.

use anidirector_core::{ImageRef, StoryConfig, StoryIdea, StoryboardData};
use anidirector_error::{GenerationError, GenerationErrorKind, GenerationResult};
use anidirector_interface::{ImageRequest, MediaGenerator};
use async_trait::async_trait;

/// Refuses every generation call with a permanent error.
///
/// Lets a [`Studio`](anidirector_storyboard::Studio) list, export and restore
/// projects without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl OfflineGenerator {
    fn refuse<T>() -> GenerationResult<T> {
        Err(GenerationError::new(GenerationErrorKind::Request(
            "No media provider configured".to_string(),
        )))
    }
}

#[async_trait]
impl MediaGenerator for OfflineGenerator {
    async fn generate_idea(&self) -> GenerationResult<StoryIdea> {
        Self::refuse()
    }

    async fn generate_storyboard_plan(
        &self,
        _config: &StoryConfig,
    ) -> GenerationResult<StoryboardData> {
        Self::refuse()
    }

    async fn generate_character_design(
        &self,
        _name: &str,
        _description: &str,
    ) -> GenerationResult<ImageRef> {
        Self::refuse()
    }

    async fn generate_image(&self, _request: &ImageRequest) -> GenerationResult<ImageRef> {
        Self::refuse()
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }
}
