use crate::{
    CapabilityGate, CoreResult,
    notify::ChangeNotifier,
    protocol::{ActionKind, ActionRecord, PendingAction},
    store::{SharedStore, StoreKey, write_record},
};

use std::collections::BTreeMap;

use tracing::{info, instrument};

/// Writes user intents into the pending-action slot.
///
/// There is no queue: a new action overwrites one the host has not drained
/// yet, so the latest intent wins.
pub struct ActionSender<S> {
    store: S,
    gate: CapabilityGate<S>,
    notifier: ChangeNotifier,
}

impl<S: SharedStore + Clone> ActionSender<S> {
    /// Create a sender writing to `store` and announcing on `notifier`.
    pub fn new(store: S, notifier: ChangeNotifier) -> Self {
        Self {
            gate: CapabilityGate::new(store.clone()),
            store,
            notifier,
        }
    }

    /// Publish `action` for the host.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BridgeError::CapabilityRequired`] without writing
    /// anything when full access is not granted.
    #[track_caller]
    #[instrument(skip(self, parameters))]
    pub fn send(
        &self,
        action: ActionKind,
        parameters: BTreeMap<String, String>,
    ) -> CoreResult<PendingAction> {
        self.gate.require()?;

        let pending = PendingAction::new(action, parameters);

        write_record(
            &self.store,
            StoreKey::PendingAction,
            &ActionRecord::from(&pending),
        )?;
        self.store.flush()?;

        self.notifier.notify(StoreKey::PendingAction);

        info!(action = %action, issued_at = %pending.issued_at, "Action sent");

        Ok(pending)
    }

    /// Whether the last sent action is still waiting to be drained.
    pub fn is_outstanding(&self) -> CoreResult<bool> {
        Ok(self.store.get(StoreKey::PendingAction)?.is_some())
    }
}
