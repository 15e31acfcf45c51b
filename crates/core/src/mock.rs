//! Offline conversation generator used by test mode.
//!
//! Topics mentioning work, friends, or family get a fixed six-line script;
//! anything else gets a randomized exchange built from prompt and response
//! templates. The random source is injectable so transcripts can be
//! reproduced under test.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::clock::ClockTime;

// ---------------------------------------------------------------------------
// Keyword-matched scripts
// ---------------------------------------------------------------------------

/// Maximum number of lines in a keyword-matched script.
pub const SCRIPT_LENGTH: usize = 6;

/// Which participant speaks a scripted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    First,
    Second,
}

type ScriptLine = (Side, &'static str, &'static str);

const WORK_SCRIPT: [ScriptLine; SCRIPT_LENGTH] = [
    (Side::First, "9:15 AM", "Hey, did you see the email about the new project deadline?"),
    (Side::Second, "9:18 AM", "Yeah, it's pretty tight. We'll need to prioritize the main features first"),
    (Side::First, "9:22 AM", "Agreed. Should we schedule a quick call to discuss?"),
    (Side::Second, "9:25 AM", "Good idea! How about 2pm today?"),
    (Side::First, "9:27 AM", "Perfect, I'll send the calendar invite"),
    (Side::Second, "9:30 AM", "Thanks! I'll prep some notes beforehand"),
];

const FRIENDSHIP_SCRIPT: [ScriptLine; SCRIPT_LENGTH] = [
    (Side::First, "7:30 PM", "What are you up to tonight?"),
    (Side::Second, "7:33 PM", "Just watching Netflix lol. You?"),
    (Side::First, "7:35 PM", "Same! Have you seen that new series everyone's talking about?"),
    (Side::Second, "7:38 PM", "Which one? There are like 5 new shows this week 😅"),
    (Side::First, "7:40 PM", "The sci-fi one with the time travel plot"),
    (Side::Second, "7:42 PM", "Oh that one! Yeah it's actually really good. Want to watch together?"),
];

const FAMILY_SCRIPT: [ScriptLine; SCRIPT_LENGTH] = [
    (Side::First, "6:45 PM", "Dinner's ready! Come downstairs"),
    (Side::Second, "6:48 PM", "Coming! Just finishing up this assignment"),
    (Side::First, "6:50 PM", "Okay but don't let it get cold"),
    (Side::Second, "6:52 PM", "I'll be down in 2 minutes, promise"),
    (Side::First, "6:55 PM", "Alright, I'll keep your plate warm"),
    (Side::Second, "6:57 PM", "You're the best, thanks!"),
];

/// A topic family with a fixed script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicTheme {
    Work,
    Friendship,
    Family,
}

impl TopicTheme {
    /// Match a topic against the theme keywords, checked in declaration
    /// order. Matching is a case-insensitive substring test.
    pub fn detect(topic: &str) -> Option<Self> {
        let topic = topic.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| topic.contains(w));

        if mentions(&["work", "job", "project"]) {
            Some(Self::Work)
        } else if mentions(&["friend", "hang", "movie"]) {
            Some(Self::Friendship)
        } else if mentions(&["family", "dinner", "home"]) {
            Some(Self::Family)
        } else {
            None
        }
    }

    fn script(self) -> &'static [ScriptLine] {
        match self {
            Self::Work => &WORK_SCRIPT,
            Self::Friendship => &FRIENDSHIP_SCRIPT,
            Self::Family => &FAMILY_SCRIPT,
        }
    }
}

// ---------------------------------------------------------------------------
// Randomized fallback
// ---------------------------------------------------------------------------

const OPENERS: [&str; 10] = [
    "Hey, what do you think about {topic}?",
    "I've been thinking about {topic} lately. It's interesting!",
    "Have you heard the latest about {topic}?",
    "I'm not sure how I feel about {topic}, to be honest.",
    "Let me tell you what happened with {topic} yesterday!",
    "Do you want to discuss {topic} more?",
    "I can't believe what's going on with {topic}!",
    "What's your take on {topic}?",
    "I read an article about {topic} the other day.",
    "My friend was just telling me about {topic}.",
];

const RESPONSES: [&str; 10] = [
    "Oh really? Tell me more!",
    "That's interesting. I've been wondering about that too.",
    "No way! What happened?",
    "I had no idea about that!",
    "Yeah, I've been following that for a while.",
    "That's crazy! What do you think about it?",
    "I'm not surprised, to be honest.",
    "Wow, that's news to me!",
    "I've been thinking the same thing!",
    "Let's talk more about this later.",
];

/// Hour the randomized exchange starts at (10:00 AM).
const START_HOUR: u32 = 10;

/// Format one transcript line.
pub fn transcript_line(name: &str, timestamp: &str, content: &str) -> String {
    format!("{name} | {timestamp} | {content}")
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Template-based transcript generator.
pub struct MockConversationGenerator<R = StdRng> {
    rng: R,
}

impl MockConversationGenerator<StdRng> {
    /// Generator seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Generator with a fixed seed; identical seeds give identical output.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MockConversationGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MockConversationGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Produce a newline-joined transcript of `NAME | TIMESTAMP | CONTENT`
    /// lines.
    ///
    /// Keyword-matched topics return the first `min(count, 6)` script
    /// lines. Other topics return exactly `count` lines alternating
    /// `first`/`second`, starting shortly after 10:00 AM and advancing
    /// 1-5 minutes per message.
    pub fn generate(&mut self, first: &str, second: &str, topic: &str, count: usize) -> String {
        if let Some(theme) = TopicTheme::detect(topic) {
            tracing::debug!(?theme, count, "Using scripted mock conversation");
            return theme
                .script()
                .iter()
                .take(count.min(SCRIPT_LENGTH))
                .map(|(side, time, text)| {
                    let name = match side {
                        Side::First => first,
                        Side::Second => second,
                    };
                    transcript_line(name, time, text)
                })
                .collect::<Vec<_>>()
                .join("\n");
        }

        let mut clock = ClockTime::new(START_HOUR, 0);
        let mut lines = Vec::new();

        for i in 0..count {
            clock.advance(self.rng.random_range(1..=5));
            let timestamp = clock.to_string();

            let line = if i % 2 == 0 {
                let opener = OPENERS.choose(&mut self.rng).copied().unwrap_or(OPENERS[0]);
                transcript_line(first, &timestamp, &opener.replacen("{topic}", topic, 1))
            } else {
                let response = RESPONSES
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(RESPONSES[0]);
                transcript_line(second, &timestamp, response)
            };
            lines.push(line);
        }

        lines.join("\n")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
