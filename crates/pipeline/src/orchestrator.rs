//! The generation orchestrator.

use std::sync::Arc;

use dialogue_core::character::Character;
use dialogue_core::error::CoreError;
use dialogue_core::prompt::{ConversationPrompt, PromptSpeaker};
use dialogue_core::render::{render, ConversationView, Participant};
use dialogue_core::settings::ApiSettings;
use dialogue_core::transcript::{parse_transcript, Message};
use dialogue_db::repositories::{CharacterRepo, SettingsRepo};
use dialogue_llm::RemoteGenerationClient;
use serde::Serialize;

use crate::request::GenerationRequest;
use crate::PipelineError;

/// Display names used when no character is selected for a side.
pub const DEFAULT_FIRST_NAME: &str = "Character 1";
pub const DEFAULT_SECOND_NAME: &str = "Character 2";

/// Result of one generation action.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedConversation {
    /// Raw transcript text as returned by the generator.
    pub transcript: String,
    pub messages: Vec<Message>,
    pub view: ConversationView,
}

pub struct GenerationOrchestrator {
    characters: Arc<CharacterRepo>,
    settings: Arc<SettingsRepo>,
    generator: Arc<RemoteGenerationClient>,
}

impl GenerationOrchestrator {
    pub fn new(
        characters: Arc<CharacterRepo>,
        settings: Arc<SettingsRepo>,
        generator: Arc<RemoteGenerationClient>,
    ) -> Self {
        Self {
            characters,
            settings,
            generator,
        }
    }

    /// Run one generation.
    ///
    /// All validation happens before the generator is called; generator
    /// failures are returned as-is, with no retry.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedConversation, PipelineError> {
        request.check()?;

        let settings = match &request.settings {
            Some(settings) => settings.clone(),
            None => self.settings.load().await?,
        };
        ensure_api_key(&settings)?;

        let first = self
            .resolve_character(request.first_character_id.as_deref())
            .await?;
        let second = self
            .resolve_character(request.second_character_id.as_deref())
            .await?;
        let first_name = first.as_ref().map_or(DEFAULT_FIRST_NAME, |c| c.name.as_str());
        let second_name = second.as_ref().map_or(DEFAULT_SECOND_NAME, |c| c.name.as_str());

        let topic = request.topic.trim();
        let prompt = ConversationPrompt::build(
            PromptSpeaker {
                name: first_name,
                character: first.as_ref(),
            },
            PromptSpeaker {
                name: second_name,
                character: second.as_ref(),
            },
            topic,
            request.message_count,
            request.system_prompt.as_deref(),
        );

        tracing::info!(
            first = %first_name,
            second = %second_name,
            topic = %topic,
            message_count = request.message_count,
            test_mode = settings.is_test_mode(),
            "Generating conversation"
        );

        let transcript = self.generator.generate(&prompt, &settings).await?;

        let first_participant = participant(first_name, first.as_ref());
        let second_participant = participant(second_name, second.as_ref());
        let (messages, view) =
            parse_conversation(&transcript, &first_participant, &second_participant, topic);

        tracing::info!(message_count = messages.len(), "Conversation generated");

        Ok(GeneratedConversation {
            transcript,
            messages,
            view,
        })
    }

    /// Look up a selected character. Unknown ids fall back to the default
    /// display name, like an unselected side.
    async fn resolve_character(&self, id: Option<&str>) -> Result<Option<Character>, PipelineError> {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        let found = self.characters.find(id).await?;
        if found.is_none() {
            tracing::warn!(character_id = %id, "Selected character not found, using default name");
        }
        Ok(found)
    }
}

fn ensure_api_key(settings: &ApiSettings) -> Result<(), CoreError> {
    if !settings.is_test_mode() && settings.api_key.trim().is_empty() {
        return Err(CoreError::Validation(
            "Please enter your API key".to_string(),
        ));
    }
    Ok(())
}

fn participant(name: &str, character: Option<&Character>) -> Participant {
    Participant::new(name, character.and_then(|c| c.avatar.clone()))
}

/// Parse a transcript and render it for two participants.
///
/// Unattributable lines go to `first`.
pub fn parse_conversation(
    transcript: &str,
    first: &Participant,
    second: &Participant,
    topic: &str,
) -> (Vec<Message>, ConversationView) {
    let messages = parse_transcript(transcript, &first.name, &mut rand::rng());
    let view = render(&messages, first, second, topic);
    (messages, view)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
