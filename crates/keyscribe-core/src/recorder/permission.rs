/// Microphone authorization as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Never asked.
    Undetermined,
    /// Access allowed.
    Granted,
    /// Access refused.
    Denied,
}

/// Source of microphone authorization.
pub trait MicrophonePermission: Send {
    /// Current authorization, without prompting.
    fn status(&self) -> PermissionStatus;

    /// Ask for authorization and return the answer.
    fn request(&mut self) -> PermissionStatus;
}
