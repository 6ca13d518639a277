//! Narrative parameters for a project.

use serde::{Deserialize, Serialize};

/// Output frame shape for generated images.
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
    strum::EnumIter,
)]
pub enum AspectRatio {
    /// Landscape 16:9
    #[default]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Widescreen,
    /// Classic 4:3
    #[serde(rename = "4:3")]
    #[strum(serialize = "4:3")]
    Standard,
    /// Portrait 9:16
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Vertical,
}

/// A named supporting character declared by the story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryCharacter {
    /// Roster id, linked once the character has been cast
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Character name
    pub name: String,
    /// Appearance description
    #[serde(default)]
    pub description: String,
}

/// Narrative parameters the storyboard is generated from.
///
/// Field names accept the legacy keys of earlier saves so old records and
/// backups still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryConfig {
    /// Project title
    pub title: String,
    /// Protagonist name
    #[serde(alias = "mainCharacterName")]
    pub protagonist_name: String,
    /// Protagonist appearance
    #[serde(alias = "mainCharacterDescription")]
    pub protagonist_description: String,
    /// Roster id of the protagonist, linked after casting
    #[serde(alias = "mainCharacterId", skip_serializing_if = "Option::is_none")]
    pub protagonist_id: Option<String>,
    /// Supporting characters in declaration order
    #[serde(alias = "additionalCharacters")]
    pub secondary_characters: Vec<SecondaryCharacter>,
    /// Name of whoever must be rescued
    #[serde(alias = "targetToSave")]
    pub rescue_target_name: String,
    /// Appearance of the rescue target
    #[serde(alias = "targetToSaveDescription")]
    pub rescue_target_description: String,
    /// What is approaching
    pub danger_threat: String,
    /// What drives or blocks the danger
    pub danger_tool: String,
    /// Where the danger happens
    pub danger_location: String,
    /// Background environment
    #[serde(alias = "backgroundSetting")]
    pub setting: String,
    /// Observer slot kept for older saves
    #[serde(alias = "humanCharacter", skip_serializing_if = "Option::is_none")]
    pub observer: Option<String>,
    /// Frame shape
    pub aspect_ratio: AspectRatio,
}

impl StoryConfig {
    /// Every character name this story declares, in slot order.
    ///
    /// Empty slots are skipped.
    pub fn declared_names(&self) -> Vec<&str> {
        let mut names = vec![self.protagonist_name.as_str(), self.rescue_target_name.as_str()];
        names.extend(self.secondary_characters.iter().map(|c| c.name.as_str()));
        if let Some(observer) = &self.observer {
            names.push(observer.as_str());
        }
        names.retain(|name| !name.is_empty());
        names
    }

    /// Overwrite the fields an idea provides, leaving the rest untouched.
    pub fn apply_idea(&mut self, idea: StoryIdea) {
        let StoryIdea {
            title,
            protagonist_name,
            protagonist_description,
            rescue_target_name,
            rescue_target_description,
            danger_threat,
            danger_tool,
            danger_location,
            setting,
            secondary_characters,
        } = idea;

        let slots = [
            (&mut self.title, title),
            (&mut self.protagonist_name, protagonist_name),
            (&mut self.protagonist_description, protagonist_description),
            (&mut self.rescue_target_name, rescue_target_name),
            (&mut self.rescue_target_description, rescue_target_description),
            (&mut self.danger_threat, danger_threat),
            (&mut self.danger_tool, danger_tool),
            (&mut self.danger_location, danger_location),
            (&mut self.setting, setting),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(secondary) = secondary_characters {
            self.secondary_characters = secondary;
        }
    }
}

/// A partial story suggestion from the idea generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryIdea {
    /// Suggested title
    pub title: Option<String>,
    /// Suggested protagonist name
    #[serde(alias = "mainCharacterName")]
    pub protagonist_name: Option<String>,
    /// Suggested protagonist appearance
    #[serde(alias = "mainCharacterDescription")]
    pub protagonist_description: Option<String>,
    /// Suggested rescue target
    #[serde(alias = "targetToSave")]
    pub rescue_target_name: Option<String>,
    /// Suggested rescue target appearance
    #[serde(alias = "targetToSaveDescription")]
    pub rescue_target_description: Option<String>,
    /// Suggested threat
    pub danger_threat: Option<String>,
    /// Suggested tool
    pub danger_tool: Option<String>,
    /// Suggested location
    pub danger_location: Option<String>,
    /// Suggested setting
    #[serde(alias = "backgroundSetting")]
    pub setting: Option<String>,
    /// Suggested supporting cast
    #[serde(alias = "additionalCharacters")]
    pub secondary_characters: Option<Vec<SecondaryCharacter>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_keys_decode() {
        let json = r#"{
            "title": "Rails",
            "mainCharacterName": "Tico",
            "targetToSave": "Mimi",
            "additionalCharacters": [{"name": "Crow", "description": "black"}],
            "humanCharacter": "",
            "aspectRatio": "9:16"
        }"#;
        let config: StoryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.protagonist_name, "Tico");
        assert_eq!(config.rescue_target_name, "Mimi");
        assert_eq!(config.secondary_characters[0].name, "Crow");
        assert_eq!(config.aspect_ratio, AspectRatio::Vertical);
        assert_eq!(config.declared_names(), vec!["Tico", "Mimi", "Crow"]);
    }

    #[test]
    fn idea_only_touches_provided_fields() {
        let mut config = StoryConfig {
            title: "Old".into(),
            setting: "Desert".into(),
            ..Default::default()
        };
        config.apply_idea(StoryIdea {
            title: Some("New".into()),
            ..Default::default()
        });
        assert_eq!(config.title, "New");
        assert_eq!(config.setting, "Desert");
    }

    #[test]
    fn aspect_ratio_round_trips_through_strum() {
        let ratio: AspectRatio = "4:3".parse().unwrap();
        assert_eq!(ratio, AspectRatio::Standard);
        assert_eq!(ratio.to_string(), "4:3");
    }
}
