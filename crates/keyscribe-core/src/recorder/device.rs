use crate::CoreResult;

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Asynchronous notifications raised by a capture device while it records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The device stopped on its own after a complete recording
    /// (e.g. the maximum duration was reached).
    Finished {
        /// Session the event belongs to.
        session_id: Uuid,
    },
    /// The device failed mid-recording.
    Failed {
        /// Session the event belongs to.
        session_id: Uuid,
        /// Description of the failure.
        reason: String,
    },
}

impl DeviceEvent {
    /// Session the event belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            DeviceEvent::Finished { session_id } | DeviceEvent::Failed { session_id, .. } => {
                *session_id
            }
        }
    }
}

/// A singly-owned microphone capture device.
///
/// At most one session holds the device at a time; it must be finished or
/// released before the next `acquire`.
pub trait CaptureDevice: Send {
    /// Take the device and start capturing into `path`.
    fn acquire(&mut self, session_id: Uuid, path: &Path) -> CoreResult<()>;

    /// Stop keeping incoming audio without releasing the device.
    fn pause(&mut self) -> CoreResult<()>;

    /// Keep incoming audio again after [`CaptureDevice::pause`].
    fn resume(&mut self) -> CoreResult<()>;

    /// Stop capturing, write the audio file and release the device.
    fn finish(&mut self) -> CoreResult<PathBuf>;

    /// Release the device without writing anything. Idempotent.
    fn release(&mut self);

    /// Whether a session currently holds the device.
    fn is_held(&self) -> bool;
}
