//! Conversation view model.
//!
//! Decides which of the two configured participants each parsed message
//! belongs to and prepares display-ready fields.

use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize_url;
use crate::transcript::Message;

/// Avatar shown when a participant has none, or theirs fails sanitizing.
pub const PLACEHOLDER_AVATAR: &str = "/api/placeholder/40/40";

/// One side of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            name: name.into(),
            avatar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    First,
    Second,
}

/// Attribute a transcript speaker to a participant.
///
/// Heuristic: a case-insensitive substring match against the first
/// participant's name; everything else belongs to the second participant.
/// Names that contain one another (`Ann` / `Anna`) can be misattributed.
pub fn attribute(character: &str, first_name: &str) -> Speaker {
    if character
        .to_lowercase()
        .contains(&first_name.to_lowercase())
    {
        Speaker::First
    } else {
        Speaker::Second
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub speaker: Speaker,
    pub display_name: String,
    pub avatar_url: String,
    /// `Today at 9:15 AM`.
    pub timestamp_label: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    /// `First & Second`.
    pub title: String,
    pub topic: String,
    pub first: Participant,
    pub second: Participant,
    pub messages: Vec<RenderedMessage>,
}

/// Build the view model, preserving message order.
pub fn render(
    messages: &[Message],
    first: &Participant,
    second: &Participant,
    topic: &str,
) -> ConversationView {
    let first_avatar = avatar_url(first);
    let second_avatar = avatar_url(second);

    let messages = messages
        .iter()
        .map(|msg| {
            let speaker = attribute(&msg.character, &first.name);
            let (participant, avatar) = match speaker {
                Speaker::First => (first, &first_avatar),
                Speaker::Second => (second, &second_avatar),
            };
            RenderedMessage {
                speaker,
                display_name: participant.name.clone(),
                avatar_url: avatar.clone(),
                timestamp_label: format!("Today at {}", msg.timestamp),
                content: msg.content.clone(),
            }
        })
        .collect();

    ConversationView {
        title: format!("{} & {}", first.name, second.name),
        topic: topic.to_string(),
        first: first.clone(),
        second: second.clone(),
        messages,
    }
}

fn avatar_url(participant: &Participant) -> String {
    participant
        .avatar
        .as_deref()
        .map(|url| sanitize_url(url, PLACEHOLDER_AVATAR))
        .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(character: &str, content: &str) -> Message {
        Message {
            character: character.into(),
            timestamp: "9:15 AM".into(),
            content: content.into(),
        }
    }

    #[test]
    fn attribution_is_case_insensitive_substring() {
        assert_eq!(attribute("SAM", "sam"), Speaker::First);
        assert_eq!(attribute("Sam (typing)", "Sam"), Speaker::First);
        assert_eq!(attribute("Bo", "Sam"), Speaker::Second);
    }

    #[test]
    fn substring_names_are_misattributed() {
        // "Anna" contains "Ann", so the second participant is taken for the first.
        assert_eq!(attribute("Anna", "Ann"), Speaker::First);
    }

    #[test]
    fn unknown_speakers_default_to_second_participant() {
        let first = Participant::new("Al", None);
        let second = Participant::new("Bo", Some("https://example.com/bo.png".into()));
        let view = render(&[msg("Zed", "hi")], &first, &second, "weather");

        let m = &view.messages[0];
        assert_eq!(m.speaker, Speaker::Second);
        assert_eq!(m.display_name, "Bo");
        assert_eq!(m.avatar_url, "https://example.com/bo.png");
    }

    #[test]
    fn view_serializes_in_camel_case() {
        let first = Participant::new("Al", None);
        let second = Participant::new("Bo", None);
        let view = render(&[msg("Al", "hi")], &first, &second, "weather");

        let json = serde_json::to_value(&view).unwrap();
        let m = &json["messages"][0];
        assert_eq!(m["speaker"], "first");
        assert_eq!(m["displayName"], "Al");
        assert_eq!(m["avatarUrl"], PLACEHOLDER_AVATAR);
        assert_eq!(m["timestampLabel"], "Today at 9:15 AM");
        assert!(m.get("avatar_url").is_none());
    }

    #[test]
    fn render_preserves_order_and_labels_timestamps() {
        let first = Participant::new("Al", None);
        let second = Participant::new("Bo", None);
        let view = render(
            &[msg("Al", "one"), msg("Bo", "two"), msg("al", "three")],
            &first,
            &second,
            "weather",
        );

        let contents: Vec<&str> = view.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert_eq!(view.title, "Al & Bo");
        assert_eq!(view.messages[2].speaker, Speaker::First);
        assert_eq!(view.messages[0].timestamp_label, "Today at 9:15 AM");
        assert_eq!(view.messages[0].avatar_url, PLACEHOLDER_AVATAR);
    }

    #[test]
    fn unsafe_avatars_are_replaced_with_placeholder() {
        let first = Participant::new("Al", Some("javascript:alert(1)".into()));
        let second = Participant::new("Bo", None);
        let view = render(&[msg("Al", "hi")], &first, &second, "t");
        assert_eq!(view.messages[0].avatar_url, PLACEHOLDER_AVATAR);
    }
}
