//! Pacing, retry and model selection for generation calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings that govern how the core drives the generation collaborator.
///
/// # Examples
///
/// ```
/// use anidirector_core::GenerationSettings;
///
/// let settings = GenerationSettings::default();
/// assert_eq!(settings.inter_call_delay().as_millis(), 1000);
/// assert_eq!(*settings.max_reference_images(), 3);
///
/// let fast = GenerationSettings::builder()
///     .inter_call_delay_ms(0u64)
///     .transient_retry_delay_ms(0u64)
///     .build()
///     .unwrap();
/// assert!(fast.inter_call_delay().is_zero());
/// assert_eq!(*fast.max_transient_retries(), 1);
/// ```
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
#[builder(setter(into))]
pub struct GenerationSettings {
    /// Pause between consecutive batch items, in milliseconds
    #[serde(default = "default_inter_call_delay_ms")]
    #[builder(default = default_inter_call_delay_ms())]
    inter_call_delay_ms: u64,

    /// Most reference images sent with one request
    #[serde(default = "default_max_reference_images")]
    #[builder(default = default_max_reference_images())]
    max_reference_images: usize,

    /// Wait before retrying a transient failure, in milliseconds
    #[serde(default = "default_transient_retry_delay_ms")]
    #[builder(default = default_transient_retry_delay_ms())]
    transient_retry_delay_ms: u64,

    /// Retries allowed for a transient failure
    #[serde(default = "default_max_transient_retries")]
    #[builder(default = default_max_transient_retries())]
    max_transient_retries: usize,

    /// Duration given to planned scenes that arrive without one, in seconds
    #[serde(default = "default_scene_duration_secs")]
    #[builder(default = default_scene_duration_secs())]
    default_scene_duration_secs: u32,

    /// Model for ideas and story plans
    #[serde(default = "default_text_model")]
    #[builder(default = default_text_model())]
    text_model: String,

    /// Model for standard-quality images
    #[serde(default = "default_image_model")]
    #[builder(default = default_image_model())]
    image_model: String,

    /// Model for pro-quality images
    #[serde(default = "default_pro_image_model")]
    #[builder(default = default_pro_image_model())]
    pro_image_model: String,
}

fn default_inter_call_delay_ms() -> u64 {
    1000
}

fn default_max_reference_images() -> usize {
    3
}

fn default_transient_retry_delay_ms() -> u64 {
    2000
}

fn default_max_transient_retries() -> usize {
    1
}

fn default_scene_duration_secs() -> u32 {
    3
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_pro_image_model() -> String {
    "gemini-3-pro-image-preview".to_string()
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            inter_call_delay_ms: default_inter_call_delay_ms(),
            max_reference_images: default_max_reference_images(),
            transient_retry_delay_ms: default_transient_retry_delay_ms(),
            max_transient_retries: default_max_transient_retries(),
            default_scene_duration_secs: default_scene_duration_secs(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            pro_image_model: default_pro_image_model(),
        }
    }
}

impl GenerationSettings {
    /// Creates a new settings builder.
    pub fn builder() -> GenerationSettingsBuilder {
        GenerationSettingsBuilder::default()
    }

    /// Pause between consecutive batch items.
    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }

    /// Wait before retrying a transient failure.
    pub fn transient_retry_delay(&self) -> Duration {
        Duration::from_millis(self.transient_retry_delay_ms)
    }
}
