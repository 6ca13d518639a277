//! Character references for a scene image request.

use crate::Roster;
use anidirector_core::{Character, ImageRef, Scene, StoryConfig};

/// Portraits and descriptions of the characters appearing in a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct SceneReferences {
    /// Portraits, capped, in roster order
    images: Vec<ImageRef>,
    /// One description line per matched character, portrait or not
    descriptions: Vec<String>,
    /// Names of the matched characters
    names: Vec<String>,
}

impl SceneReferences {
    /// Break into images and descriptions.
    pub fn into_parts(self) -> (Vec<ImageRef>, Vec<String>) {
        (self.images, self.descriptions)
    }
}

fn names_overlap(character: &str, involved: &str) -> bool {
    !character.is_empty()
        && !involved.is_empty()
        && (character.contains(involved) || involved.contains(character))
}

/// Resolve the roster members a scene involves.
///
/// A member matches when its name contains, or is contained in, one of the
/// scene's involved names. Scenes naming nobody the roster knows fall back
/// to the story's protagonist, if cast.
pub fn resolve_references(
    scene: &Scene,
    roster: &Roster,
    config: &StoryConfig,
    max_images: usize,
) -> SceneReferences {
    let mut matched: Vec<&Character> = roster
        .members()
        .iter()
        .filter(|c| {
            scene
                .involved_character_names()
                .iter()
                .any(|n| names_overlap(c.name(), n))
        })
        .collect();

    if matched.is_empty()
        && let Some(protagonist) = roster.get(&config.protagonist_name)
    {
        tracing::debug!(
            scene_id = scene.id(),
            protagonist = %protagonist.name(),
            "No named characters matched, using protagonist"
        );
        matched.push(protagonist);
    }

    SceneReferences {
        images: matched
            .iter()
            .filter_map(|c| c.image_ref().clone())
            .take(max_images)
            .collect(),
        descriptions: matched.iter().map(|c| c.reference_description()).collect(),
        names: matched.iter().map(|c| c.name().clone()).collect(),
    }
}
