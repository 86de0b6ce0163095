use keyscribe_core::BridgeError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors raised by the keyboard extension.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Error from the shared-store protocol.
    #[error("Bridge error: {source} {location}")]
    Bridge {
        /// The underlying bridge error.
        #[source]
        source: BridgeError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to copy text to clipboard.
    #[error("Failed to copy to clipboard: {reason} {location}")]
    ClipboardError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to simulate the paste keystroke.
    #[error("Auto-paste failed: {reason} {location}")]
    AutoPasteFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from the terminal or filesystem.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl KeyboardError {
    /// Text for the keyboard's status line.
    pub fn user_message(&self) -> String {
        match self {
            KeyboardError::Bridge { source, .. } => source.user_message(),
            KeyboardError::ClipboardError { reason, .. }
            | KeyboardError::AutoPasteFailed { reason, .. } => {
                format!("could not insert text: {}", reason)
            }
            KeyboardError::ConfigError { reason, .. } => reason.clone(),
            KeyboardError::IoError { source, .. } => source.to_string(),
        }
    }
}

impl From<BridgeError> for KeyboardError {
    #[track_caller]
    fn from(source: BridgeError) -> Self {
        KeyboardError::Bridge {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for KeyboardError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        KeyboardError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `KeyboardError`.
pub type Result<T> = StdResult<T, KeyboardError>;
