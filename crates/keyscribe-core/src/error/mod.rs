use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors raised by the shared-store protocol and the recording state machine.
///
/// Every variant carries the source location where it was created.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The extension tried to act without full access to the shared store.
    #[error("Full access to the shared store is required {location}")]
    CapabilityRequired {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Microphone access was refused.
    #[error("Microphone permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture device could not be set up for a new session.
    #[error("Device acquisition failed: {reason} {location}")]
    DeviceAcquisitionFailed {
        /// Description of the acquisition failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A pending action carried a tag this build does not understand.
    #[error("Unknown action: {tag:?} {location}")]
    UnknownAction {
        /// The raw action tag found in the record.
        tag: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The transcription collaborator reported a failure.
    #[error("Transcription failed: {reason} {location}")]
    TranscriptionFailed {
        /// Message reported by the collaborator.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The shared store could not be opened or is not accessible.
    #[error("Shared store unavailable: {reason} {location}")]
    StoreUnavailable {
        /// Description of why the store is unavailable.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error while reading or writing the shared store.
    #[error("Shared store IO error: {source} {location}")]
    StoreIo {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A record could not be encoded or decoded.
    #[error("Record {key} could not be encoded: {reason} {location}")]
    RecordEncoding {
        /// Store key of the record.
        key: String,
        /// Description of the encoding failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture device operation failed after acquisition.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl BridgeError {
    /// Short human-readable message suitable for `RecordingStatus.errorMessage`.
    pub fn user_message(&self) -> String {
        match self {
            BridgeError::CapabilityRequired { .. } => {
                "full access required: enable it in keyboard settings".to_string()
            }
            BridgeError::PermissionDenied { .. } => "permission denied".to_string(),
            BridgeError::DeviceAcquisitionFailed { reason, .. } => {
                format!("could not start recording: {}", reason)
            }
            BridgeError::UnknownAction { tag, .. } => format!("unknown action: {}", tag),
            BridgeError::TranscriptionFailed { reason, .. } => reason.clone(),
            BridgeError::StoreUnavailable { reason, .. } => {
                format!("shared store unavailable: {}", reason)
            }
            BridgeError::StoreIo { source, .. } => format!("shared store error: {}", source),
            BridgeError::RecordEncoding { key, reason, .. } => {
                format!("bad {} record: {}", key, reason)
            }
            BridgeError::DeviceError { reason, .. } => format!("audio device error: {}", reason),
        }
    }
}

impl From<std::io::Error> for BridgeError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        BridgeError::StoreIo {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;
