//! Prompt construction for remote generation.

use crate::character::Character;

/// System prompt used unless the request supplies its own.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI that generates realistic text message \
conversations between two characters. Create natural, casual, and authentic conversations like \
real text messages. Use any provided character details to influence their personality, \
communication style, and relationship dynamic. Keep all content appropriate and respectful.";

/// One side of the prompt: the display name plus the stored record, when
/// one was selected.
#[derive(Debug, Clone, Copy)]
pub struct PromptSpeaker<'a> {
    pub name: &'a str,
    pub character: Option<&'a Character>,
}

/// The two-message exchange sent to a chat-completion endpoint, plus the
/// fields test mode needs to synthesize a transcript without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
    pub first_name: String,
    pub second_name: String,
    pub topic: String,
    pub message_count: u32,
}

impl ConversationPrompt {
    /// Build the prompt. A blank `system_prompt` override falls back to
    /// [`DEFAULT_SYSTEM_PROMPT`].
    pub fn build(
        first: PromptSpeaker<'_>,
        second: PromptSpeaker<'_>,
        topic: &str,
        message_count: u32,
        system_prompt: Option<&str>,
    ) -> Self {
        let mut user_prompt = format!(
            "Generate a conversation between {} and {} about {topic}.\n\
             Create exactly {message_count} messages total, alternating between the two characters.\n\
             Format each message as: \"CHARACTER_NAME | TIMESTAMP | message content\"\n\
             Where TIMESTAMP should be in format \"12:34 PM\" and progress realistically throughout \
             the conversation (messages should be a few minutes apart).",
            first.name, second.name,
        );

        let details: Vec<String> = [first, second]
            .iter()
            .filter_map(|speaker| speaker.character.map(Character::details_line))
            .collect();

        if !details.is_empty() {
            user_prompt.push_str("\n\nCharacter Details:\n");
            for line in details {
                user_prompt.push_str(&line);
                user_prompt.push('\n');
            }
        }

        user_prompt.push_str(
            "\n\nNot all replies need to be short - sometimes the context implies a longer \
             message is appropriate, use judgment.",
        );

        let system_prompt = system_prompt
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .to_string();

        Self {
            system_prompt,
            user_prompt,
            first_name: first.name.to_string(),
            second_name: second.name.to_string(),
            topic: topic.to_string(),
            message_count,
        }
    }
}
