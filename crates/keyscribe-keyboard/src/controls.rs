use crate::{DisplayState, KeyboardResult};

use keyscribe_core::{
    ActionKind, ActionSender, BridgeError, CapabilityGate, PendingAction, RecordingState,
    SharedStore,
};

use std::collections::BTreeMap;

use tracing::{info, instrument, warn};

/// The keyboard's record/pause/stop buttons.
///
/// A failed send never propagates as a crash: the display shows the reason
/// and falls back to Idle after the grace period.
pub struct Controls<S> {
    sender: ActionSender<S>,
    gate: CapabilityGate<S>,
    display: DisplayState,
}

impl<S: SharedStore + Clone> Controls<S> {
    /// Create controls writing through `sender`.
    pub fn new(sender: ActionSender<S>, store: S, display: DisplayState) -> Self {
        Self {
            sender,
            gate: CapabilityGate::new(store),
            display,
        }
    }

    /// Whether the extension can reach the shared store.
    pub fn has_full_access(&self) -> bool {
        self.gate.has_elevated_capability()
    }

    /// Send one action to the host.
    #[instrument(skip(self, parameters))]
    pub fn press(
        &self,
        action: ActionKind,
        parameters: BTreeMap<String, String>,
    ) -> KeyboardResult<PendingAction> {
        match self.sender.send(action, parameters) {
            Ok(pending) => {
                self.display.cancel_grace();
                info!(action = %pending.action, "Action sent");
                Ok(pending)
            }
            Err(e) => {
                let message = match &e {
                    BridgeError::CapabilityRequired { .. } => {
                        "Allow Full Access in keyboard settings to dictate".to_string()
                    }
                    other => other.user_message(),
                };
                warn!(error = %e, "Action not sent");
                self.display
                    .show_transient(RecordingState::Error, Some(message));
                Err(e.into())
            }
        }
    }
}
