//! Scenes and storyboards.

use crate::ImageRef;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Narrative act of a scene.
///
/// Serialized as `1`, `2` or `3`. Decoding also accepts strings that contain
/// the act digit, such as `"Act 2"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(into = "u8", try_from = "ActRepr")]
pub enum Act {
    /// Setup
    #[display("Act 1")]
    One,
    /// Confrontation
    #[display("Act 2")]
    Two,
    /// Resolution
    #[display("Act 3")]
    Three,
}

impl Act {
    /// The act number, 1 through 3.
    pub fn number(self) -> u8 {
        match self {
            Act::One => 1,
            Act::Two => 2,
            Act::Three => 3,
        }
    }

    /// Act for a number, if it is in range.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Act::One),
            2 => Some(Act::Two),
            3 => Some(Act::Three),
            _ => None,
        }
    }
}

impl From<Act> for u8 {
    fn from(act: Act) -> Self {
        act.number()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActRepr {
    Number(u8),
    Label(String),
}

impl TryFrom<ActRepr> for Act {
    type Error = String;

    fn try_from(repr: ActRepr) -> Result<Self, Self::Error> {
        match repr {
            ActRepr::Number(n) => Act::from_number(n).ok_or_else(|| format!("act {n} out of range")),
            ActRepr::Label(label) => label
                .chars()
                .filter_map(|c| c.to_digit(10))
                .find_map(|d| u8::try_from(d).ok().and_then(Act::from_number))
                .ok_or_else(|| format!("unrecognized act label: {label}")),
        }
    }
}

/// Which of a scene's two images an operation targets.
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
pub enum ImageMode {
    /// Rendered concept illustration
    #[default]
    Concept,
    /// Rough storyboard panel
    Storyboard,
}

/// One storyboard frame.
///
/// `id` is unique within its storyboard and defines narrative order.
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
pub struct Scene {
    /// Position in the storyboard
    id: u32,
    /// Narrative act
    act: Act,
    /// Seconds from the start of the piece
    #[builder(default)]
    #[serde(default, alias = "startTimeSeconds")]
    start_offset: u32,
    /// Length in seconds
    #[builder(default = 3)]
    #[serde(default)]
    duration: u32,
    /// What happens in the frame
    #[builder(default)]
    #[serde(default)]
    visual_description: String,
    /// Technical prompt for downstream video tools
    #[builder(default)]
    #[serde(default, alias = "videoPrompt")]
    generation_prompt: String,
    /// Shot type
    #[builder(default)]
    #[serde(default)]
    camera_angle: String,
    /// Names of characters appearing in the frame
    #[builder(default)]
    #[serde(default, alias = "charactersInvolved")]
    involved_character_names: Vec<String>,
    /// Concept illustration
    #[builder(default)]
    #[serde(default, alias = "generatedImageUrl")]
    concept_image_ref: Option<ImageRef>,
    /// Concept illustration in flight
    #[builder(default)]
    #[serde(default, alias = "isGeneratingImage")]
    concept_generating: bool,
    /// Storyboard panel
    #[builder(default)]
    #[serde(default, alias = "storyboardImageUrl")]
    board_image_ref: Option<ImageRef>,
    /// Storyboard panel in flight
    #[builder(default)]
    #[serde(default, alias = "isGeneratingStoryboard")]
    board_generating: bool,
}

impl Scene {
    /// Creates a new scene builder.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Seconds from the start at which the scene ends.
    pub fn end_offset(&self) -> u32 {
        self.start_offset.saturating_add(self.duration)
    }

    /// The image currently held for `mode`.
    pub fn image(&self, mode: ImageMode) -> Option<&ImageRef> {
        match mode {
            ImageMode::Concept => self.concept_image_ref.as_ref(),
            ImageMode::Storyboard => self.board_image_ref.as_ref(),
        }
    }

    /// Whether an image for `mode` is in flight.
    pub fn is_generating(&self, mode: ImageMode) -> bool {
        match mode {
            ImageMode::Concept => self.concept_generating,
            ImageMode::Storyboard => self.board_generating,
        }
    }

    /// Mark an image for `mode` as in flight.
    pub fn begin_generation(&mut self, mode: ImageMode) {
        *self.generating_flag(mode) = true;
    }

    /// Store a finished image and clear the in-flight flag.
    pub fn complete_generation(&mut self, mode: ImageMode, image: ImageRef) {
        *self.generating_flag(mode) = false;
        match mode {
            ImageMode::Concept => self.concept_image_ref = Some(image),
            ImageMode::Storyboard => self.board_image_ref = Some(image),
        }
    }

    /// Clear the in-flight flag without touching the stored image.
    pub fn abandon_generation(&mut self, mode: ImageMode) {
        *self.generating_flag(mode) = false;
    }

    /// Clear both in-flight flags.
    pub fn clear_generating_flags(&mut self) {
        self.concept_generating = false;
        self.board_generating = false;
    }

    fn generating_flag(&mut self, mode: ImageMode) -> &mut bool {
        match mode {
            ImageMode::Concept => &mut self.concept_generating,
            ImageMode::Storyboard => &mut self.board_generating,
        }
    }
}

/// The ordered scenes of one project plus a style note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardData {
    /// Scenes in narrative order
    scenes: Vec<Scene>,
    /// Overall visual style
    #[serde(default, alias = "overallVibe")]
    overall_style_note: String,
}

impl StoryboardData {
    /// Create a storyboard from scenes in narrative order.
    pub fn new(scenes: Vec<Scene>, overall_style_note: impl Into<String>) -> Self {
        Self {
            scenes,
            overall_style_note: overall_style_note.into(),
        }
    }

    /// Look up a scene by id.
    pub fn scene(&self, id: u32) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Look up a scene by id for mutation.
    pub fn scene_mut(&mut self, id: u32) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == id)
    }

    /// The first scene id that appears more than once, if any.
    ///
    /// Scenes are addressed by id, so a storyboard with a repeated id cannot
    /// be generated scene by scene.
    pub fn duplicate_scene_id(&self) -> Option<u32> {
        let mut seen = HashSet::with_capacity(self.scenes.len());
        self.scenes.iter().map(|s| s.id).find(|id| !seen.insert(*id))
    }

    /// Mutable access to every scene.
    pub fn scenes_mut(&mut self) -> &mut [Scene] {
        &mut self.scenes
    }

    /// Lay scenes end to end starting at zero.
    ///
    /// Scenes with no duration get `default_duration`.
    pub fn assign_offsets(&mut self, default_duration: u32) {
        let mut cursor = 0;
        for scene in &mut self.scenes {
            if scene.duration == 0 {
                scene.duration = default_duration;
            }
            scene.start_offset = cursor;
            cursor = cursor.saturating_add(scene.duration);
        }
    }

    /// Number of scenes holding a concept image.
    pub fn concept_image_count(&self) -> usize {
        self.scenes
            .iter()
            .filter(|s| s.concept_image_ref.is_some())
            .count()
    }
}
