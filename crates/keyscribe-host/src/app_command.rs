use keyscribe_core::{CoreResult, Transcription};

use uuid::Uuid;

/// Commands delivered to the host event loop.
#[derive(Debug)]
pub enum AppCommand {
    /// The host came to the foreground; check the action slot now.
    Foreground,
    /// A background transcription finished.
    TranscriptionFinished {
        /// Session the transcription belongs to.
        session_id: Uuid,
        /// Text or failure from the transcription service.
        result: CoreResult<Transcription>,
    },
    /// Request application shutdown.
    Shutdown,
}
