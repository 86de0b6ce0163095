use crate::BridgeError;

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// User intents the extension can ask the host to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Acquire the microphone and begin a new session.
    StartRecording,
    /// Suspend capture, keeping the session open.
    PauseRecording,
    /// Continue a paused session.
    ResumeRecording,
    /// Finish capture and hand the file to transcription.
    StopRecording,
    /// Re-publish the current status without touching the device.
    CheckStatus,
}

impl ActionKind {
    /// Tag written into the `action` field of the record.
    pub fn as_tag(&self) -> &'static str {
        match self {
            ActionKind::StartRecording => "startRecording",
            ActionKind::PauseRecording => "pauseRecording",
            ActionKind::ResumeRecording => "resumeRecording",
            ActionKind::StopRecording => "stopRecording",
            ActionKind::CheckStatus => "checkStatus",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for ActionKind {
    type Err = BridgeError;

    #[track_caller]
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "startRecording" => Ok(ActionKind::StartRecording),
            "pauseRecording" => Ok(ActionKind::PauseRecording),
            "resumeRecording" => Ok(ActionKind::ResumeRecording),
            "stopRecording" => Ok(ActionKind::StopRecording),
            "checkStatus" => Ok(ActionKind::CheckStatus),
            other => Err(BridgeError::UnknownAction {
                tag: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
