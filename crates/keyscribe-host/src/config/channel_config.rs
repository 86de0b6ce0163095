use crate::config::{default_poll_interval_ms, default_watch_interval_ms};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling cadence for the action channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Fallback poll of the pending-action slot.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Sampling interval of the store watcher that raises wake-ups.
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            watch_interval_ms: default_watch_interval_ms(),
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
