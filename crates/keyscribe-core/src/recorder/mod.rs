mod device;
mod outcome;
mod permission;
mod service;
mod session;

pub use {
    device::{CaptureDevice, DeviceEvent},
    outcome::{ActionOutcome, StoppedSession},
    permission::{MicrophonePermission, PermissionStatus},
    service::{PROMPT_PARAMETER, RecordingService, recording_file_name},
};
