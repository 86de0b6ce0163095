use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shared State Store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory both processes use as the shared container.
    pub dir: PathBuf,
}
