//! Records exchanged through the shared store.
//!
//! All records are flat camelCase JSON objects. Every field defaults when
//! absent so older and newer builds can read each other's records.

mod action_kind;
mod insertion_payload;
mod pending_action;
mod recording_status;

pub use {
    action_kind::ActionKind,
    insertion_payload::InsertionPayload,
    pending_action::{ActionRecord, EXTENSION_ORIGIN, PendingAction},
    recording_status::{RecordingState, RecordingStatus},
};
