//! Wall-clock times displayed in 12-hour form (`9:05 AM`).

use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

/// Regex pattern matching a 12-hour display timestamp.
pub const TIMESTAMP_PATTERN: &str = r"^(1[0-2]|[1-9]):[0-5][0-9] (AM|PM)$";

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIMESTAMP_PATTERN).expect("valid regex"));

/// A time of day on a 24-hour clock, displayed in 12-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    /// Values out of range wrap (`hour % 24`, `minute % 60`).
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }

    /// A uniformly random time of day.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random_range(0..24), rng.random_range(0..60))
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Move the clock forward, rolling minutes into hours and hours past
    /// midnight.
    pub fn advance(&mut self, minutes: u32) {
        let total = self.minute + minutes;
        self.hour = (self.hour + total / 60) % 24;
        self.minute = total % 60;
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_hour = match self.hour {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        };
        let meridiem = if self.hour < 12 { "AM" } else { "PM" };
        write!(f, "{display_hour}:{:02} {meridiem}", self.minute)
    }
}

/// Whether `value` is a 12-hour display timestamp such as `12:34 PM`.
pub fn is_display_timestamp(value: &str) -> bool {
    TIMESTAMP_RE.is_match(value)
}
