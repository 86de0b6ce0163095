//! Interface to the transcription and cleanup service.
//!
//! The service itself lives outside this crate; the host supplies an
//! implementation.

use crate::CoreResult;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One finished recording to transcribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    /// Audio file produced by the capture device.
    pub audio_path: PathBuf,
    /// Cleanup prompt, if any.
    pub prompt: Option<String>,
    /// Account the request is made for.
    pub user_id: String,
}

/// Result of a successful transcription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transcription {
    /// Verbatim speech-to-text output.
    pub raw_text: String,
    /// Cleaned text to insert.
    pub final_text: String,
    /// Length of the audio in seconds.
    pub duration_seconds: f64,
    /// Prompt the service actually applied.
    pub prompt_used: Option<String>,
}

/// Turns a recording into cleaned text.
///
/// Failures are reported as [`crate::BridgeError::TranscriptionFailed`].
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    /// Transcribe and clean up `request.audio_path`.
    async fn transcribe(&self, request: TranscriptionRequest) -> CoreResult<Transcription>;
}
