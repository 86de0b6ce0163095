//! Uploads finished recordings to the transcription and cleanup service.

use crate::{AppError, AppResult, config::TranscriptionConfig};

use keyscribe_core::{
    BridgeError, CoreResult, Transcription, TranscriptionClient, TranscriptionRequest,
};

use std::panic::Location;

use async_trait::async_trait;
use error_location::ErrorLocation;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, instrument};

/// Multipart HTTP client for the transcription service.
///
/// Sends the WAV file as `file` plus `user_id` and optional `prompt` form
/// fields, and expects a camelCase JSON [`Transcription`] back.
pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranscriptionClient {
    /// Build a client from configuration. Does not contact the service.
    #[track_caller]
    pub fn new(config: &TranscriptionConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::TranscriptionSetup {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl TranscriptionClient for HttpTranscriptionClient {
    #[instrument(skip(self, request), fields(audio_path = ?request.audio_path))]
    async fn transcribe(&self, request: TranscriptionRequest) -> CoreResult<Transcription> {
        let audio = tokio::fs::read(&request.audio_path)
            .await
            .map_err(|e| failed(format!("Failed to read {:?}: {}", request.audio_path, e)))?;

        let file_name = request
            .audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording.wav".to_string());

        let part = Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| failed(format!("Invalid audio part: {}", e)))?;

        let mut form = Form::new()
            .part("file", part)
            .text("user_id", request.user_id);
        if let Some(prompt) = request.prompt {
            form = form.text("prompt", prompt);
        }

        let mut builder = self.client.post(&self.endpoint).multipart(form);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| failed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!(
                "Server returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| failed(format!("Invalid response: {}", e)))?;

        debug!(raw_len = transcription.raw_text.len(), "Raw transcription received");
        info!(
            final_len = transcription.final_text.len(),
            duration_seconds = transcription.duration_seconds,
            prompt_used = transcription.prompt_used.is_some(),
            "Transcription received"
        );

        Ok(transcription)
    }
}

#[track_caller]
fn failed(reason: String) -> BridgeError {
    BridgeError::TranscriptionFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
