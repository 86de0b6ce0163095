use crate::KeyboardResult;

use keyscribe_core::container_dir;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shared State Store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Shared container directory. Defaults to the platform data directory
    /// the host uses.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured directory, or the default container.
    pub fn resolve_dir(&self) -> KeyboardResult<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(container_dir()?),
        }
    }
}
