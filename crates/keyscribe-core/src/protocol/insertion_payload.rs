use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cleaned text waiting to be inserted at the caret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertionPayload {
    /// Text to insert.
    pub text: String,
    /// Session that produced the text.
    pub session_id: Option<Uuid>,
    /// When the host wrote the payload.
    pub created_at: DateTime<Utc>,
}

impl InsertionPayload {
    /// Build a payload for `session_id` stamped with the current time.
    pub fn new(text: impl Into<String>, session_id: Uuid) -> Self {
        Self {
            text: text.into(),
            session_id: Some(session_id),
            created_at: Utc::now(),
        }
    }
}
