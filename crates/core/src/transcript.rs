//! Transcript parsing.
//!
//! A transcript is a text blob with one message per line in the form
//! `NAME | TIMESTAMP | CONTENT`. Lines that do not follow the format are
//! recovered as well as possible instead of being dropped.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// `NAME | TIMESTAMP | CONTENT`, fields whitespace-trimmed.
pub const STRICT_LINE_PATTERN: &str = r"^(.+?)\s*\|\s*(.+?)\s*\|\s*(.+)$";

/// `NAME: CONTENT`, where the name holds no `:` or `|` and is at most 50
/// characters.
pub const LOOSE_LINE_PATTERN: &str = r"^([^:|]{1,50}?)\s*:\s*(.+)$";

static STRICT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STRICT_LINE_PATTERN).expect("valid regex"));

static LOOSE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LOOSE_LINE_PATTERN).expect("valid regex"));

/// One parsed message. Transient: rebuilt on every generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Speaker name as written in the transcript.
    pub character: String,
    /// 12-hour display time, e.g. `9:15 AM`.
    pub timestamp: String,
    pub content: String,
}

/// Parse one non-blank line.
///
/// Tries the strict pipe format, then `NAME: CONTENT` with a random
/// timestamp, then attributes the whole line to `first_speaker` with a
/// random timestamp.
pub fn parse_line<R: Rng + ?Sized>(line: &str, first_speaker: &str, rng: &mut R) -> Message {
    let line = line.trim();

    if let Some(caps) = STRICT_LINE_RE.captures(line) {
        return Message {
            character: caps[1].trim().to_string(),
            timestamp: caps[2].trim().to_string(),
            content: caps[3].trim().to_string(),
        };
    }

    if let Some(caps) = LOOSE_LINE_RE.captures(line) {
        return Message {
            character: caps[1].trim().to_string(),
            timestamp: ClockTime::random(rng).to_string(),
            content: caps[2].trim().to_string(),
        };
    }

    tracing::debug!(line, "Unstructured transcript line attributed to first speaker");
    Message {
        character: first_speaker.to_string(),
        timestamp: ClockTime::random(rng).to_string(),
        content: line.to_string(),
    }
}

/// Parse a transcript into messages, one per non-blank line, in input order.
pub fn parse_transcript<R: Rng + ?Sized>(
    transcript: &str,
    first_speaker: &str,
    rng: &mut R,
) -> Vec<Message> {
    transcript
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(line, first_speaker, rng))
        .collect()
}
