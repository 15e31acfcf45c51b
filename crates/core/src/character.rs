//! Character records and the form submission that produces them.
//!
//! A [`Character`] is the persisted persona used to parameterise a
//! conversation. Records are written by the character repository with
//! upsert semantics keyed on [`Character::id`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix for generated character ids.
pub const ID_PREFIX: &str = "char_";

/// Upper bound accepted for a character's age.
pub const MAX_AGE: u32 = 150;

/// Generate a new time-ordered character id.
pub fn new_character_id() -> EntityId {
    format!("{ID_PREFIX}{}", uuid::Uuid::now_v7().simple())
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// A persisted character record.
///
/// Field names serialize in camelCase so exported files match the
/// import format (`textingStyle`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Relation to the counterpart character, e.g. `"coworker"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texting_style: Option<String>,
    /// An http(s) URL or an inline `data:image/...;base64,` payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Character {
    /// Describe the character for the generation prompt.
    ///
    /// Produces `Name: Age 30, Personality: ..., Texting style: ...`,
    /// omitting absent fields. A character with no details yields
    /// `Name: `.
    pub fn details_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(age) = self.age.filter(|age| *age > 0) {
            parts.push(format!("Age {age}"));
        }
        if let Some(personality) = &self.personality {
            parts.push(format!("Personality: {personality}"));
        }
        if let Some(background) = &self.background {
            parts.push(format!("Background: {background}"));
        }
        if let Some(style) = &self.texting_style {
            parts.push(format!("Texting style: {style}"));
        }
        if let Some(relationship) = &self.relationship {
            parts.push(format!("Relationship to other character: {relationship}"));
        }
        format!("{}: {}", self.name, parts.join(", "))
    }

    /// Build a character from one entry of an imported JSON array.
    ///
    /// Returns `None` unless the entry is an object with a non-empty string
    /// `id` and a non-empty string `name`. Optional fields of the wrong type
    /// are dropped instead of rejecting the whole record.
    pub fn from_import_record(record: &serde_json::Value) -> Option<Character> {
        let object = record.as_object()?;
        let id = object.get("id")?.as_str().filter(|s| !s.is_empty())?;
        let name = object.get("name")?.as_str().filter(|s| !s.is_empty())?;

        let text = |key: &str| {
            object
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Character {
            id: id.to_string(),
            name: name.to_string(),
            age: object
                .get("age")
                .and_then(|v| v.as_u64())
                .and_then(|age| u32::try_from(age).ok()),
            personality: text("personality"),
            background: text("background"),
            relationship: text("relationship"),
            texting_style: text("textingStyle"),
            avatar: text("avatar"),
        })
    }
}

// ---------------------------------------------------------------------------
// CharacterDraft
// ---------------------------------------------------------------------------

/// A character form submission.
///
/// `id` is present when an existing record is being edited; otherwise a
/// new id is generated by [`CharacterDraft::into_character`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDraft {
    pub id: Option<EntityId>,
    #[validate(length(min = 1, max = 100, message = "Character name is required (max 100 characters)"))]
    #[serde(default)]
    pub name: String,
    #[validate(range(max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<u32>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub relationship: Option<String>,
    pub texting_style: Option<String>,
    pub avatar: Option<String>,
}

/// Trim a free-text field, mapping blank values to `None`.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CharacterDraft {
    /// Trim every text field and drop blank optional values.
    pub fn normalized(self) -> Self {
        Self {
            id: clean(self.id),
            name: self.name.trim().to_string(),
            age: self.age,
            personality: clean(self.personality),
            background: clean(self.background),
            relationship: clean(self.relationship),
            texting_style: clean(self.texting_style),
            avatar: clean(self.avatar),
        }
    }

    /// Validate the draft and convert it into a [`Character`].
    pub fn into_character(self) -> Result<Character, CoreError> {
        let draft = self.normalized();
        draft.validate()?;

        Ok(Character {
            id: draft.id.unwrap_or_else(new_character_id),
            name: draft.name,
            age: draft.age,
            personality: draft.personality,
            background: draft.background,
            relationship: draft.relationship,
            texting_style: draft.texting_style,
            avatar: draft.avatar,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
