use crate::{
    BridgeError, CoreResult,
    protocol::{ActionRecord, PendingAction},
    store::{SharedStore, StoreKey},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Drains the pending-action slot on the host side.
#[derive(Debug, Clone)]
pub struct ActionReceiver<S> {
    store: S,
}

impl<S: SharedStore> ActionReceiver<S> {
    /// Create a receiver reading from `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Take the pending action, if any.
    ///
    /// The slot is cleared before the record is even decoded, so an action
    /// runs at most once even if handling it fails or the process dies
    /// midway. Safe to call from any trigger at any time.
    ///
    /// # Errors
    ///
    /// A record that cannot be decoded or carries an unknown tag is still
    /// removed, and reported as [`BridgeError::RecordEncoding`] or
    /// [`BridgeError::UnknownAction`].
    #[track_caller]
    #[instrument(skip(self))]
    pub fn drain(&self) -> CoreResult<Option<PendingAction>> {
        let Some(raw) = self.store.take(StoreKey::PendingAction)? else {
            debug!("No pending action");
            return Ok(None);
        };

        let record: ActionRecord =
            serde_json::from_str(&raw).map_err(|e| BridgeError::RecordEncoding {
                key: StoreKey::PendingAction.to_string(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let action = PendingAction::try_from(record)?;

        info!(
            action = %action.action,
            issued_at = %action.issued_at,
            origin = %action.origin,
            "Pending action drained"
        );

        Ok(Some(action))
    }
}
