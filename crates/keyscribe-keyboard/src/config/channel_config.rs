use crate::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WATCH_INTERVAL_MS};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling cadence for the status channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Fallback poll of the status and insertion slots.
    pub poll_interval_ms: u64,
    /// Sampling interval of the store watcher.
    pub watch_interval_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            watch_interval_ms: DEFAULT_WATCH_INTERVAL_MS,
        }
    }
}

impl ChannelConfig {
    /// Fallback poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Store watcher sampling interval.
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms.max(1))
    }
}
