//! Roster characters.

use crate::ImageRef;
use serde::{Deserialize, Serialize};

/// A durable roster member that outlives any single project.
///
/// `id` never changes once assigned. `name` is the natural key used for
/// matching characters across casting, library edits and backup restores.
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
pub struct Character {
    /// Stable identifier
    id: String,
    /// Display name, also the match key
    name: String,
    /// Appearance description
    #[builder(default)]
    #[serde(default)]
    description: String,
    /// Portrait, if one has been generated
    #[builder(default)]
    #[serde(default, alias = "imageUrl")]
    image_ref: Option<ImageRef>,
}

impl Character {
    /// Create a character.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        image_ref: Option<ImageRef>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            image_ref,
        }
    }

    /// Creates a new character builder.
    pub fn builder() -> CharacterBuilder {
        CharacterBuilder::default()
    }

    /// The line handed to the image model alongside this character's portrait.
    pub fn reference_description(&self) -> String {
        format!("Name: {}, Appearance: {}", self.name, self.description)
    }
}
