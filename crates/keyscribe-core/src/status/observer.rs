use crate::{
    BridgeError, CoreResult,
    protocol::{InsertionPayload, RecordingStatus},
    store::{SharedStore, StoreKey, read_record},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Extension-side reader of the status record and insertion payload.
///
/// Remembers the last status it reported so repeated polls of an unchanged
/// record produce nothing.
#[derive(Debug, Clone)]
pub struct StatusObserver<S> {
    store: S,
    last: Option<RecordingStatus>,
}

impl<S: SharedStore> StatusObserver<S> {
    /// Create an observer reading from `store`.
    pub fn new(store: S) -> Self {
        Self { store, last: None }
    }

    /// Last published status, or the default Idle status if none exists.
    pub fn current(&self) -> CoreResult<RecordingStatus> {
        Ok(read_record(&self.store, StoreKey::RecordingStatus)?.unwrap_or_default())
    }

    /// Read the status and return it only if it differs from the last one
    /// this observer returned.
    #[instrument(skip(self))]
    pub fn poll(&mut self) -> CoreResult<Option<RecordingStatus>> {
        let status = self.current()?;

        if let Some(last) = &self.last
            && last.same_state_as(&status)
        {
            return Ok(None);
        }

        debug!(state = %status.state, "Recording status changed");
        self.last = Some(status.clone());
        Ok(Some(status))
    }

    /// Consume the insertion payload, returning its text.
    ///
    /// Reading and deleting happen as one step; a second call right after
    /// returns `None`. Empty payloads are consumed and ignored.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn drain_insertion_payload(&self) -> CoreResult<Option<String>> {
        let Some(raw) = self.store.take(StoreKey::InsertionPayload)? else {
            return Ok(None);
        };

        let payload: InsertionPayload =
            serde_json::from_str(&raw).map_err(|e| BridgeError::RecordEncoding {
                key: StoreKey::InsertionPayload.to_string(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if payload.text.is_empty() {
            debug!("Discarded empty insertion payload");
            return Ok(None);
        }

        info!(
            session_id = ?payload.session_id,
            text_len = payload.text.len(),
            "Insertion payload drained"
        );

        Ok(Some(payload.text))
    }
}
