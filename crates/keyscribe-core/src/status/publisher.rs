use crate::{
    CoreResult,
    notify::ChangeNotifier,
    protocol::{InsertionPayload, RecordingStatus},
    store::{SharedStore, StoreKey, write_record},
};

use tracing::{debug, info, instrument};

/// Host-side writer of the status record and insertion payload.
#[derive(Debug, Clone)]
pub struct StatusPublisher<S> {
    store: S,
    notifier: ChangeNotifier,
}

impl<S: SharedStore> StatusPublisher<S> {
    /// Create a publisher writing to `store` and announcing on `notifier`.
    pub fn new(store: S, notifier: ChangeNotifier) -> Self {
        Self { store, notifier }
    }

    /// Overwrite the status record with `status` in a single write.
    #[instrument(skip(self, status), fields(state = %status.state))]
    pub fn publish(&self, status: &RecordingStatus) -> CoreResult<()> {
        write_record(&self.store, StoreKey::RecordingStatus, status)?;
        self.store.flush()?;
        self.notifier.notify(StoreKey::RecordingStatus);

        debug!(
            duration_seconds = status.duration_seconds,
            "Recording status published"
        );

        Ok(())
    }

    /// Overwrite the insertion payload. An unconsumed older payload is lost.
    #[instrument(skip(self, payload), fields(session_id = ?payload.session_id))]
    pub fn publish_insertion(&self, payload: &InsertionPayload) -> CoreResult<()> {
        write_record(&self.store, StoreKey::InsertionPayload, payload)?;
        self.store.flush()?;
        self.notifier.notify(StoreKey::InsertionPayload);

        info!(text_len = payload.text.len(), "Insertion payload published");

        Ok(())
    }
}
