use crate::config::{default_duration_tick_ms, default_max_duration_secs};

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Directory session audio files are written to.
    pub dir: PathBuf,

    /// How often the published duration is refreshed while recording.
    #[serde(default = "default_duration_tick_ms")]
    pub duration_tick_ms: u64,

    /// Recording stops on its own after this many seconds.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    /// Keep audio files after a successful transcription.
    #[serde(default)]
    pub keep_recordings: bool,
}

impl RecordingConfig {
    /// Duration refresh interval.
    pub fn duration_tick(&self) -> Duration {
        Duration::from_millis(self.duration_tick_ms.max(1))
    }

    /// Maximum length of one session.
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs.max(1))
    }
}
