use std::{path::PathBuf, time::Duration};

use tokio::time::Instant;
use uuid::Uuid;

/// Bookkeeping for the session currently tracked by the state machine.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) id: Uuid,
    pub(crate) file_path: PathBuf,
    pub(crate) prompt: Option<String>,
    accumulated: Duration,
    segment_started: Option<Instant>,
}

impl Session {
    pub(crate) fn start(file_path: PathBuf, prompt: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_path,
            prompt,
            accumulated: Duration::ZERO,
            segment_started: Some(Instant::now()),
        }
    }

    /// Captured time so far, excluding paused stretches.
    pub(crate) fn elapsed(&self) -> Duration {
        self.accumulated
            + self
                .segment_started
                .map(|started| started.elapsed())
                .unwrap_or_default()
    }

    /// Fold the running segment into the total. Idempotent.
    pub(crate) fn freeze(&mut self) {
        if let Some(started) = self.segment_started.take() {
            self.accumulated += started.elapsed();
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.segment_started.is_none() {
            self.segment_started = Some(Instant::now());
        }
    }
}
