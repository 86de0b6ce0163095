use std::fmt;

/// The fixed set of records exchanged through the shared store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Single-slot mailbox written by the extension, drained by the host.
    PendingAction,
    /// Last published host state. Overwritten, never deleted.
    RecordingStatus,
    /// Single-slot mailbox written by the host, drained by the extension.
    InsertionPayload,
    /// Disposable marker used by the capability probe.
    CapabilityProbe,
}

impl StoreKey {
    /// Stable on-disk name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::PendingAction => "pending_action",
            StoreKey::RecordingStatus => "recording_status",
            StoreKey::InsertionPayload => "insertion_payload",
            StoreKey::CapabilityProbe => "capability_probe",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
