use std::{fmt, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Host recording states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordingState {
    /// No session; ready to start.
    #[default]
    Idle,
    /// Microphone held and capturing.
    Recording,
    /// Session open, capture suspended.
    Paused,
    /// Device released; waiting for the transcription result.
    Processing,
    /// Session finished successfully.
    Completed,
    /// Session failed; see `errorMessage`.
    Error,
}

impl RecordingState {
    /// Whether the capture device is held in this state.
    pub fn holds_device(&self) -> bool {
        matches!(self, RecordingState::Recording | RecordingState::Paused)
    }

    /// Whether a start action is accepted from this state.
    pub fn accepts_start(&self) -> bool {
        matches!(
            self,
            RecordingState::Idle | RecordingState::Completed | RecordingState::Error
        )
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingState::Idle => write!(f, "Idle"),
            RecordingState::Recording => write!(f, "Recording"),
            RecordingState::Paused => write!(f, "Paused"),
            RecordingState::Processing => write!(f, "Processing"),
            RecordingState::Completed => write!(f, "Completed"),
            RecordingState::Error => write!(f, "Error"),
        }
    }
}

/// Snapshot of the host state machine, published after every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordingStatus {
    /// Current state.
    pub state: RecordingState,
    /// Captured seconds in the current session, excluding paused time.
    pub duration_seconds: f64,
    /// Audio file of the current session.
    pub active_file_path: Option<PathBuf>,
    /// Human-readable failure, set only in the Error state.
    pub error_message: Option<String>,
    /// Session the snapshot belongs to.
    pub session_id: Option<Uuid>,
    /// When the host wrote the snapshot.
    pub updated_at: DateTime<Utc>,
}

impl RecordingStatus {
    /// Whether two snapshots describe the same observable state.
    ///
    /// Ignores `updated_at`, which changes on every publish.
    pub fn same_state_as(&self, other: &RecordingStatus) -> bool {
        self.state == other.state
            && self.duration_seconds == other.duration_seconds
            && self.active_file_path == other.active_file_path
            && self.error_message == other.error_message
            && self.session_id == other.session_id
    }
}
