//! The immutable input of one generation action.

use dialogue_core::error::CoreError;
use dialogue_core::settings::ApiSettings;
use dialogue_core::types::EntityId;
use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_MESSAGE_COUNT: u32 = 10;
pub const MAX_MESSAGE_COUNT: u32 = 100;

fn default_message_count() -> u32 {
    DEFAULT_MESSAGE_COUNT
}

/// Everything needed to generate one conversation, captured up front.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Stored character for the first speaker; `None` uses a default name.
    #[serde(default)]
    pub first_character_id: Option<EntityId>,
    #[serde(default)]
    pub second_character_id: Option<EntityId>,
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_message_count")]
    #[validate(range(min = 1, max = 100, message = "Message count must be between 1 and 100"))]
    pub message_count: u32,
    /// Replaces the default system prompt when non-blank.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Overrides the persisted settings for this request only.
    #[serde(default)]
    pub settings: Option<ApiSettings>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            first_character_id: None,
            second_character_id: None,
            topic: topic.into(),
            message_count: DEFAULT_MESSAGE_COUNT,
            system_prompt: None,
            settings: None,
        }
    }

    pub fn with_characters(mut self, first: Option<&str>, second: Option<&str>) -> Self {
        self.first_character_id = first.map(str::to_string);
        self.second_character_id = second.map(str::to_string);
        self
    }

    pub fn with_message_count(mut self, count: u32) -> Self {
        self.message_count = count;
        self
    }

    pub fn with_settings(mut self, settings: ApiSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Check the request on its own, before any settings are known.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        if self.topic.trim().is_empty() {
            return Err(CoreError::Validation(
                "Please enter a conversation topic".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn missing_fields_take_defaults() {
        let req: GenerationRequest = serde_json::from_str(r#"{"topic":"lunch"}"#).unwrap();
        assert_eq!(req.message_count, DEFAULT_MESSAGE_COUNT);
        assert!(req.first_character_id.is_none());
        assert!(req.check().is_ok());
    }

    #[test]
    fn blank_topic_is_rejected() {
        assert_matches!(
            GenerationRequest::new("   ").check(),
            Err(CoreError::Validation(msg)) if msg.contains("topic")
        );
    }

    #[test]
    fn message_count_is_bounded() {
        for count in [0, MAX_MESSAGE_COUNT + 1] {
            let req = GenerationRequest::new("lunch").with_message_count(count);
            assert_matches!(req.check(), Err(CoreError::Validation(_)));
        }
        assert!(GenerationRequest::new("lunch")
            .with_message_count(MAX_MESSAGE_COUNT)
            .check()
            .is_ok());
    }
}
