//! Process-shared key/value store used as the only channel between the
//! extension and the host.
//!
//! Each key holds at most one JSON record. Writers replace a record wholesale;
//! consumers delete it after reading.

mod file_store;
mod memory_store;
mod store_key;

pub use {file_store::FileStore, memory_store::MemoryStore, store_key::StoreKey};

use crate::{BridgeError, CoreResult};

use std::{panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Serialize, de::DeserializeOwned};

/// A durable key/value store visible to both processes.
///
/// Implementations must make `set` atomic per key: a concurrent reader sees
/// either the previous value or the new one.
pub trait SharedStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: StoreKey) -> CoreResult<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: StoreKey, value: &str) -> CoreResult<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&self, key: StoreKey) -> CoreResult<()>;

    /// Remove `key` and return the value it held, as one step.
    ///
    /// A write racing with `take` is either returned by it or left in place
    /// for the next call; it is never deleted unread.
    fn take(&self, key: StoreKey) -> CoreResult<Option<String>>;

    /// Force previous writes to durable storage.
    fn flush(&self) -> CoreResult<()>;
}

/// Decode the record stored under `key`, if any.
#[track_caller]
pub fn read_record<T, S>(store: &S, key: StoreKey) -> CoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: SharedStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    let record = serde_json::from_str(&raw).map_err(|e| BridgeError::RecordEncoding {
        key: key.to_string(),
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(Some(record))
}

/// Encode `record` and store it under `key` as a single write.
#[track_caller]
pub fn write_record<T, S>(store: &S, key: StoreKey, record: &T) -> CoreResult<()>
where
    T: Serialize,
    S: SharedStore + ?Sized,
{
    let raw = serde_json::to_string(record).map_err(|e| BridgeError::RecordEncoding {
        key: key.to_string(),
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    store.set(key, &raw)
}

/// Default location of the shared container directory.
///
/// Both processes resolve the same path, so a zero-config host and keyboard
/// meet in the same store.
#[track_caller]
pub fn container_dir() -> CoreResult<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "keyscribe", "KeyScribe").ok_or_else(|| {
        BridgeError::StoreUnavailable {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    Ok(proj_dirs.data_dir().join("shared"))
}
