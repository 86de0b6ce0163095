use crate::{BridgeError, CoreResult, store::SharedStore, store::StoreKey};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use error_location::ErrorLocation;

/// In-memory store whose clones share the same contents.
///
/// Hand one clone to a host-side component and another to an extension-side
/// component to run both ends of the protocol in one process. Availability
/// can be toggled to simulate the capability being revoked.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<StoreKey, String>>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create a store on which every operation fails.
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    /// Grant or revoke access for every clone of this store.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[track_caller]
    fn ensure_available(&self) -> CoreResult<()> {
        if self.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(BridgeError::StoreUnavailable {
                reason: "access revoked".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

impl SharedStore for MemoryStore {
    #[track_caller]
    fn get(&self, key: StoreKey) -> CoreResult<Option<String>> {
        self.ensure_available()?;
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&key).cloned())
    }

    #[track_caller]
    fn set(&self, key: StoreKey, value: &str) -> CoreResult<()> {
        self.ensure_available()?;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.insert(key, value.to_string());
        Ok(())
    }

    #[track_caller]
    fn remove(&self, key: StoreKey) -> CoreResult<()> {
        self.ensure_available()?;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.remove(&key);
        Ok(())
    }

    #[track_caller]
    fn take(&self, key: StoreKey) -> CoreResult<Option<String>> {
        self.ensure_available()?;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.remove(&key))
    }

    #[track_caller]
    fn flush(&self) -> CoreResult<()> {
        self.ensure_available()
    }
}
