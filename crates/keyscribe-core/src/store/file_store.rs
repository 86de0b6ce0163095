use crate::{BridgeError, CoreResult, store::SharedStore, store::StoreKey};

use std::{
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

/// Directory-backed store holding one JSON file per key.
///
/// Writes go to a uniquely named temp file that is synced and then renamed
/// over the key file, so readers in the other process never observe a
/// partially written record.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating its directory if needed. Used by the host.
    #[track_caller]
    #[instrument(skip(dir), fields(dir = ?dir.as_ref()))]
    pub fn open<P: AsRef<Path>>(dir: P) -> CoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| unavailable(&dir, e))?;
            debug!(dir = ?dir, "Created shared store directory");
        }

        Ok(Self { dir })
    }

    /// Attach to an existing store without creating anything.
    ///
    /// Used by the extension: if the directory is missing or inaccessible,
    /// every operation fails with [`BridgeError::StoreUnavailable`].
    pub fn attach<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    #[track_caller]
    fn ensure_available(&self) -> CoreResult<()> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(BridgeError::StoreUnavailable {
                reason: format!("{:?} is not an accessible directory", self.dir),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

impl SharedStore for FileStore {
    #[track_caller]
    fn get(&self, key: StoreKey) -> CoreResult<Option<String>> {
        self.ensure_available()?;

        match fs::read_to_string(self.key_path(key)) {
            Ok(raw) => {
                trace!(key = %key, len = raw.len(), "Read record");
                Ok(Some(raw))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io(&self.dir, e)),
        }
    }

    #[track_caller]
    fn set(&self, key: StoreKey, value: &str) -> CoreResult<()> {
        self.ensure_available()?;

        // Unique temp name: both processes may be writing at the same time.
        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key.as_str(), Uuid::new_v4()));

        let result = (|| -> std::io::Result<()> {
            let mut temp_file = fs::File::create(&temp_path)?;
            temp_file.write_all(value.as_bytes())?;
            temp_file.sync_all()?;
            fs::rename(&temp_path, self.key_path(key))
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(map_io(&self.dir, e));
        }

        trace!(key = %key, len = value.len(), "Wrote record");
        Ok(())
    }

    #[track_caller]
    fn remove(&self, key: StoreKey) -> CoreResult<()> {
        self.ensure_available()?;

        match fs::remove_file(self.key_path(key)) {
            Ok(()) => {
                trace!(key = %key, "Removed record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&self.dir, e)),
        }
    }

    #[track_caller]
    fn take(&self, key: StoreKey) -> CoreResult<Option<String>> {
        self.ensure_available()?;

        // Claim the record by renaming it away first. Only one process can
        // win the rename; a record written after it lands in the key file
        // and waits for the next take.
        let claimed_path = self
            .dir
            .join(format!(".{}.{}.claimed", key.as_str(), Uuid::new_v4()));

        match fs::rename(self.key_path(key), &claimed_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_io(&self.dir, e)),
        }

        let raw = fs::read_to_string(&claimed_path);
        let _ = fs::remove_file(&claimed_path);
        let raw = raw.map_err(|e| map_io(&self.dir, e))?;

        trace!(key = %key, len = raw.len(), "Took record");
        Ok(Some(raw))
    }

    #[track_caller]
    fn flush(&self) -> CoreResult<()> {
        self.ensure_available()?;

        // Renames are only durable once the directory entry is synced.
        #[cfg(unix)]
        fs::File::open(&self.dir)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| map_io(&self.dir, e))?;

        Ok(())
    }
}

#[track_caller]
fn map_io(dir: &Path, e: std::io::Error) -> BridgeError {
    if e.kind() == ErrorKind::PermissionDenied {
        unavailable(dir, e)
    } else {
        BridgeError::StoreIo {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

#[track_caller]
fn unavailable(dir: &Path, e: std::io::Error) -> BridgeError {
    BridgeError::StoreUnavailable {
        reason: format!("{:?}: {}", dir, e),
        location: ErrorLocation::from(Location::caller()),
    }
}
