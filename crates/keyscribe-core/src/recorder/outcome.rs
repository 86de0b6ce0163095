use crate::{BridgeError, protocol::RecordingState};

use std::path::PathBuf;

use uuid::Uuid;

/// A session that just moved to Processing and needs transcribing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedSession {
    /// Session id, used to match the transcription result.
    pub session_id: Uuid,
    /// Finished audio file.
    pub audio_path: PathBuf,
    /// Prompt supplied with the start action, if any.
    pub prompt: Option<String>,
}

/// What handling a drained action did.
#[derive(Debug)]
pub enum ActionOutcome {
    /// A new session is recording.
    Started {
        /// The new session.
        session_id: Uuid,
    },
    /// The session was paused.
    Paused,
    /// The session is recording again.
    Resumed {
        /// The resumed session.
        session_id: Uuid,
    },
    /// Capture finished; the caller must run transcription.
    Stopped(StoppedSession),
    /// Status was published again without a transition.
    Republished,
    /// The action is not valid in the current state.
    Ignored {
        /// State the action was ignored in.
        state: RecordingState,
    },
    /// The action failed and the machine moved to Error.
    Failed(BridgeError),
}
