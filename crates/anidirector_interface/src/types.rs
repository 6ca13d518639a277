//! Request types for image generation.

use anidirector_core::{AspectRatio, ImageMode, ImageRef};
use serde::{Deserialize, Serialize};

/// Quality tier requested from the image model.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageQuality {
    /// Fast, cheaper model
    #[default]
    Standard,
    /// Slower, higher-fidelity model
    Pro,
}

/// A single scene or panel image request.
///
/// Implementations honour at most three reference images; callers cap the
/// list before building the request.
///
/// # Examples
///
/// ```
/// use anidirector_core::{AspectRatio, ImageMode};
/// use anidirector_interface::ImageRequest;
///
/// let request = ImageRequest::builder()
///     .prompt("Tico dashes along the rails")
///     .aspect_ratio(AspectRatio::Vertical)
///     .build()
///     .unwrap();
/// assert_eq!(*request.mode(), ImageMode::Concept);
/// assert!(request.reference_images().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Scene description or composed panel prompt
    prompt: String,
    /// Character portraits to keep identities consistent
    #[builder(default)]
    reference_images: Vec<ImageRef>,
    /// One `Name: X, Appearance: Y` line per referenced character
    #[builder(default)]
    character_descriptions: Vec<String>,
    /// Frame shape
    #[builder(default)]
    aspect_ratio: AspectRatio,
    /// Concept illustration or storyboard panel
    #[builder(default)]
    mode: ImageMode,
    /// Model tier
    #[builder(default)]
    quality: ImageQuality,
}

impl ImageRequest {
    /// Creates a new image request builder.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }

    /// A request with no character references.
    pub fn new(
        prompt: impl Into<String>,
        aspect_ratio: AspectRatio,
        mode: ImageMode,
        quality: ImageQuality,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            reference_images: Vec::new(),
            character_descriptions: Vec::new(),
            aspect_ratio,
            mode,
            quality,
        }
    }

    /// Attach character portraits and description lines.
    pub fn with_references(mut self, images: Vec<ImageRef>, descriptions: Vec<String>) -> Self {
        self.reference_images = images;
        self.character_descriptions = descriptions;
        self
    }
}
