//! Extension-side check for full access to the shared store.

use crate::{BridgeError, CoreResult, store::SharedStore, store::StoreKey};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Probes whether the shared store is currently writable and readable.
///
/// Access can be revoked while the extension is suspended, so the answer is
/// never cached. Each probe costs one write, flush, read and delete; call it
/// on explicit user actions, not per frame.
#[derive(Debug, Clone)]
pub struct CapabilityGate<S> {
    store: S,
}

impl<S: SharedStore> CapabilityGate<S> {
    /// Create a gate probing `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether full access is granted right now. Never fails.
    #[instrument(skip(self))]
    pub fn has_elevated_capability(&self) -> bool {
        match self.probe() {
            Ok(granted) => {
                debug!(granted, "Capability probe finished");
                granted
            }
            Err(e) => {
                debug!(error = ?e, "Capability probe failed");
                false
            }
        }
    }

    /// Fail with [`BridgeError::CapabilityRequired`] unless access is granted.
    #[track_caller]
    pub fn require(&self) -> CoreResult<()> {
        if self.has_elevated_capability() {
            Ok(())
        } else {
            warn!("Full access to the shared store is not granted");
            Err(BridgeError::CapabilityRequired {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    fn probe(&self) -> CoreResult<bool> {
        let marker = Uuid::new_v4().to_string();

        self.store.set(StoreKey::CapabilityProbe, &marker)?;

        // The marker is removed even when the round trip fails.
        let read_back = self
            .store
            .flush()
            .and_then(|()| self.store.get(StoreKey::CapabilityProbe));
        let removed = self.store.remove(StoreKey::CapabilityProbe);
        let read_back = read_back?;
        removed?;

        Ok(read_back.as_deref() == Some(marker.as_str()))
    }
}
