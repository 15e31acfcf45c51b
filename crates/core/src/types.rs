/// Character records are keyed by opaque string tokens (e.g. `char_0190...`).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
