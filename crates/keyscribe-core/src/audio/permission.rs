use crate::recorder::{MicrophonePermission, PermissionStatus};

use cpal::traits::HostTrait;
use tracing::{info, instrument, warn};

/// Microphone authorization backed by the platform audio host.
///
/// Desktop platforms have no separate consent prompt the host can raise, so
/// a request asks the audio backend to enumerate input devices: a refusal
/// means access is denied. A machine without any microphone still counts as
/// granted; starting will then fail at device acquisition instead.
#[derive(Debug, Default)]
pub struct HostMicrophonePermission {
    answer: Option<PermissionStatus>,
}

impl HostMicrophonePermission {
    /// Create an undetermined permission.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MicrophonePermission for HostMicrophonePermission {
    fn status(&self) -> PermissionStatus {
        self.answer.unwrap_or(PermissionStatus::Undetermined)
    }

    #[instrument(skip(self))]
    fn request(&mut self) -> PermissionStatus {
        let answer = match cpal::default_host().input_devices() {
            Ok(_) => {
                info!("Microphone access granted");
                PermissionStatus::Granted
            }
            Err(e) => {
                warn!(error = %e, "Audio backend refused input device access");
                PermissionStatus::Denied
            }
        };

        self.answer = Some(answer);
        answer
    }
}
