//! Character identity resolution.
//!
//! Two character records denote the same roster member when their
//! [`match_key`]s are equal. The key is the character's name, compared
//! case-sensitively and exactly.

use anidirector_core::{Character, StoryConfig};
use std::collections::HashMap;

/// The identity key of a character: its name, verbatim.
pub fn match_key(character: &Character) -> &str {
    character.name()
}

/// Result of merging one candidate into a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No member shared the candidate's key; it was appended.
    Inserted {
        /// Position of the new member
        position: usize,
    },
    /// The candidate replaced the member with the same key, in place.
    Replaced {
        /// Position of the replaced member
        position: usize,
        /// The record that was replaced
        previous: Character,
    },
}

/// The durable, project-independent character collection.
///
/// Members keep their insertion order. Lookups go through a map from
/// [`match_key`] to position, so matching never scans names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Character>,
    index: HashMap<String, usize>,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from stored records, in stored order.
    ///
    /// If two records share a name, the later one is the one matched from
    /// then on. Both stay in the member list.
    pub fn from_characters(members: Vec<Character>) -> Self {
        let index = members
            .iter()
            .enumerate()
            .map(|(position, c)| (match_key(c).to_string(), position))
            .collect();
        Self { members, index }
    }

    /// Members in order.
    pub fn members(&self) -> &[Character] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member matched by `name`.
    pub fn get(&self, name: &str) -> Option<&Character> {
        self.index.get(name).map(|&position| &self.members[position])
    }

    /// Merge a candidate: replace the member with the same key in place, or
    /// append it. Last write wins; fields are never combined.
    pub fn merge(&mut self, candidate: Character) -> MergeOutcome {
        match self.index.get(match_key(&candidate)) {
            Some(&position) => {
                let previous = std::mem::replace(&mut self.members[position], candidate);
                MergeOutcome::Replaced { position, previous }
            }
            None => {
                let position = self.members.len();
                self.index.insert(match_key(&candidate).to_string(), position);
                self.members.push(candidate);
                MergeOutcome::Inserted { position }
            }
        }
    }

    /// Merge candidates one at a time, in order.
    pub fn merge_all(&mut self, candidates: impl IntoIterator<Item = Character>) {
        for candidate in candidates {
            self.merge(candidate);
        }
    }

    /// Remove the member with this id.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Character> {
        let position = self.members.iter().position(|c| c.id() == id)?;
        let removed = self.members.remove(position);
        *self = Self::from_characters(std::mem::take(&mut self.members));
        Some(removed)
    }

    /// Members used by a story: those whose name fills the protagonist,
    /// rescue target, a secondary slot, or the observer slot.
    ///
    /// Computed from the live roster on every call.
    pub fn used_by(&self, config: &StoryConfig) -> Vec<Character> {
        let declared = config.declared_names();
        self.members
            .iter()
            .filter(|c| declared.contains(&match_key(c)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(id: &str, name: &str, description: &str) -> Character {
        Character::new(id, name, description, None)
    }

    #[test]
    fn duplicate_names_resolve_to_the_later_record() {
        let roster = Roster::from_characters(vec![
            character("1", "Tico", "first"),
            character("2", "Tico", "second"),
        ]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("Tico").map(|c| c.id().as_str()), Some("2"));
    }

    #[test]
    fn merge_replaces_in_place_by_exact_name() {
        let mut roster = Roster::from_characters(vec![
            character("1", "Tico", "grey mouse"),
            character("2", "Mimi", "white kitten"),
        ]);
        let outcome = roster.merge(character("9", "Tico", "updated"));
        assert!(matches!(outcome, MergeOutcome::Replaced { position: 0, .. }));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.members()[0].description(), "updated");

        // Case matters.
        roster.merge(character("3", "tico", "lowercase"));
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn used_by_covers_every_declared_slot() {
        let roster = Roster::from_characters(vec![
            character("1", "Tico", ""),
            character("2", "Mimi", ""),
            character("3", "Crow", ""),
            character("4", "Grandpa", ""),
            character("5", "Wolf", ""),
        ]);
        let config = StoryConfig {
            protagonist_name: "Tico".into(),
            rescue_target_name: "Mimi".into(),
            secondary_characters: vec![anidirector_core::SecondaryCharacter {
                id: None,
                name: "Crow".into(),
                description: String::new(),
            }],
            observer: Some("Grandpa".into()),
            ..Default::default()
        };
        let used: Vec<String> = roster.used_by(&config).iter().map(|c| c.name().clone()).collect();
        assert_eq!(used, vec!["Tico", "Mimi", "Crow", "Grandpa"]);
    }

    #[test]
    fn removal_reindexes_later_members() {
        let mut roster = Roster::from_characters(vec![
            character("1", "Tico", ""),
            character("2", "Mimi", ""),
        ]);
        roster.remove_by_id("1");
        assert_eq!(roster.get("Mimi").map(|c| c.id().as_str()), Some("2"));
        assert!(roster.get("Tico").is_none());
    }
}
