use crate::config::DEFAULT_GRACE_PERIOD_MS;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status line behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long a transient Completed or Error stays up before Idle.
    pub grace_period_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
        }
    }
}

impl DisplayConfig {
    /// Grace period before a transient state reverts to Idle.
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}
