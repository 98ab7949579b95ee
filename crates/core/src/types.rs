/// Call requests are keyed by random UUIDs generated at creation.
pub type CallId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
