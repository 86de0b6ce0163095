//! KeyScribe Core Library
//!
//! Lets a sandboxed keyboard extension drive microphone recording in a
//! separate host process, and receive the cleaned-up transcription back,
//! using nothing but a shared key/value store both processes can reach.
//!
//! - The extension writes intents into a single-slot mailbox with
//!   [`ActionSender`]; the host drains it with [`ActionReceiver`].
//! - The host runs a [`RecordingService`] and mirrors its state through
//!   [`StatusPublisher`]; the extension reads it with [`StatusObserver`].
//! - [`ChangeNotifier`] and [`StoreWatcher`] only shorten latency. Both
//!   channels stay correct under plain polling.
//!
//! # Example
//!
//! ```no_run
//! use keyscribe_core::{
//!     ActionKind, ActionReceiver, ActionSender, ChangeNotifier, CoreResult, MemoryStore,
//! };
//!
//! use std::collections::BTreeMap;
//!
//! fn main() -> CoreResult<()> {
//!     let store = MemoryStore::new();
//!     let sender = ActionSender::new(store.clone(), ChangeNotifier::new());
//!     let receiver = ActionReceiver::new(store);
//!
//!     sender.send(ActionKind::StartRecording, BTreeMap::new())?;
//!     let drained = receiver.drain()?;
//!
//!     println!("Host received: {:?}", drained.map(|a| a.action));
//!     Ok(())
//! }
//! ```

mod action;
mod audio;
mod capability;
mod error;
mod notify;
mod protocol;
mod recorder;
mod status;
mod store;
mod transcription;

pub use {
    action::{ActionReceiver, ActionSender},
    audio::{HostMicrophonePermission, WavRecorder},
    capability::CapabilityGate,
    error::{BridgeError, Result as CoreResult},
    notify::{ChangeNotifier, StoreWatcher},
    protocol::{
        ActionKind, ActionRecord, EXTENSION_ORIGIN, InsertionPayload, PendingAction,
        RecordingState, RecordingStatus,
    },
    recorder::{
        ActionOutcome, CaptureDevice, DeviceEvent, MicrophonePermission, PROMPT_PARAMETER,
        PermissionStatus, RecordingService, StoppedSession, recording_file_name,
    },
    status::{StatusObserver, StatusPublisher},
    store::{
        FileStore, MemoryStore, SharedStore, StoreKey, container_dir, read_record, write_record,
    },
    transcription::{Transcription, TranscriptionClient, TranscriptionRequest},
};

#[cfg(test)]
mod tests;
