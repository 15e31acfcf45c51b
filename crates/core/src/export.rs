//! Standalone HTML export of a rendered conversation.

use std::fmt::Write as _;

use crate::render::{ConversationView, Speaker, PLACEHOLDER_AVATAR};
use crate::sanitize::{safe_filename_component, sanitize_text, sanitize_url};
use crate::types::Timestamp;

const STYLE: &str = r#"
        body {
            font-family: 'Whitney', 'Helvetica Neue', Helvetica, Arial, sans-serif;
            background-color: #36393f;
            color: #dcddde;
            margin: 0;
            padding: 20px;
        }
        .container { max-width: 800px; margin: 0 auto; background: #2f3136; border-radius: 16px; overflow: hidden; }
        .chat-header { background: linear-gradient(135deg, #5865f2 0%, #4752c4 100%); padding: 24px; text-align: center; }
        .chat-title { color: white; font-size: 28px; font-weight: 700; margin: 0 0 8px; }
        .chat-subtitle { color: rgba(255,255,255,0.9); font-size: 16px; margin: 0; }
        .chat-messages { padding: 32px; }
        .message { display: flex; margin-bottom: 24px; padding: 16px 20px; border-radius: 12px; }
        .message.first { background: rgba(88,101,242,0.08); border-left: 3px solid #5865f2; }
        .message.second { background: rgba(59,165,93,0.08); border-left: 3px solid #3ba55d; }
        .message-avatar { width: 48px; height: 48px; border-radius: 50%; margin-right: 16px; overflow: hidden; flex-shrink: 0; }
        .message-avatar img { width: 100%; height: 100%; object-fit: cover; }
        .message-username { font-weight: 600; font-size: 16px; margin-bottom: 6px; }
        .message-timestamp { color: #72767d; font-size: 12px; font-weight: 500; margin-left: 8px; }
        .message-text { color: #dcddde; font-size: 15px; line-height: 1.6; margin-top: 2px; white-space: pre-wrap; }
        .chat-footer { padding: 20px; text-align: center; border-top: 1px solid #4f545c; font-size: 12px; color: #72767d; }
"#;

/// Render `view` as a self-contained HTML document.
///
/// Every interpolated string is entity-escaped and avatars are re-checked,
/// since the view may have come back from a client.
pub fn export_chat_html(view: &ConversationView, generated_at: Timestamp) -> String {
    let title = sanitize_text(&view.title);
    let topic = if view.topic.trim().is_empty() {
        "Conversation".to_string()
    } else {
        sanitize_text(&view.topic)
    };

    let mut messages = String::new();
    for msg in &view.messages {
        let class = match msg.speaker {
            Speaker::First => "first",
            Speaker::Second => "second",
        };
        let avatar = sanitize_text(&sanitize_url(&msg.avatar_url, PLACEHOLDER_AVATAR));
        let name = sanitize_text(&msg.display_name);
        // Writing to a String cannot fail.
        let _ = write!(
            messages,
            r#"
            <div class="message {class}">
                <div class="message-avatar"><img src="{avatar}" alt="{name}"></div>
                <div class="message-body">
                    <div class="message-username">{name}<span class="message-timestamp">{timestamp}</span></div>
                    <div class="message-text">{content}</div>
                </div>
            </div>"#,
            timestamp = sanitize_text(&msg.timestamp_label),
            content = sanitize_text(&msg.content),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generated-at" content="{generated_iso}">
    <title>{title} - {topic}</title>
    <style>{STYLE}    </style>
</head>
<body>
    <div class="container">
        <div class="chat-header">
            <h1 class="chat-title">{title}</h1>
            <p class="chat-subtitle">Conversation about {topic}</p>
        </div>
        <div class="chat-messages">{messages}
        </div>
        <div class="chat-footer">
            <div>Generated on {date} at {time}</div>
            <div>Created with AI Dialogue Generator</div>
        </div>
    </div>
</body>
</html>
"#,
        generated_iso = generated_at.to_rfc3339(),
        date = generated_at.format("%B %-d, %Y"),
        time = generated_at.format("%-I:%M:%S %p UTC"),
    )
}

/// Suggested download name: `<first>_<second>_<topic>_chat.html`.
pub fn chat_export_filename(first: &str, second: &str, topic: &str) -> String {
    format!(
        "{}_{}_{}_chat.html",
        safe_filename_component(first),
        safe_filename_component(second),
        safe_filename_component(topic),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, Participant};
    use crate::transcript::Message;
    use chrono::TimeZone;

    fn view(content: &str, avatar: Option<&str>) -> ConversationView {
        let first = Participant::new("Al", avatar.map(str::to_string));
        let second = Participant::new("Bo", None);
        render(
            &[Message {
                character: "Al".into(),
                timestamp: "9:15 AM".into(),
                content: content.into(),
            }],
            &first,
            &second,
            "lunch",
        )
    }

    fn at() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn document_carries_title_messages_and_footer() {
        let html = export_chat_html(&view("see you soon", None), at());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Al &amp; Bo - lunch</title>"));
        assert!(html.contains("Conversation about lunch"));
        assert!(html.contains("see you soon"));
        assert!(html.contains("Today at 9:15 AM"));
        assert!(html.contains("Generated on March 5, 2024 at 2:07:09 PM UTC"));
    }

    #[test]
    fn content_is_escaped() {
        let html = export_chat_html(&view("<script>alert('x')</script>", None), at());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn tampered_avatars_are_replaced() {
        let mut v = view("hi", None);
        v.messages[0].avatar_url = "javascript:alert(1)".into();
        let html = export_chat_html(&v, at());
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r#"src="/api/placeholder/40/40""#));
    }

    #[test]
    fn filename_is_restricted_to_safe_characters() {
        assert_eq!(
            chat_export_filename("Al Smith", "Bo", "lunch plans?"),
            "Al_Smith_Bo_lunch_plans__chat.html"
        );
    }
}
