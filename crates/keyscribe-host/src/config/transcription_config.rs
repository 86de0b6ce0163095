use crate::config::{default_endpoint, default_timeout_secs};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// URL the recording is uploaded to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token sent with each request.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Cleanup prompt used when a start action does not carry one.
    #[serde(default)]
    pub prompt: Option<String>,

    /// Account the transcriptions are made for.
    #[serde(default)]
    pub user_id: String,

    /// Request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TranscriptionConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
