use keyscribe_core::{RecordingState, RecordingStatus};

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tracing::debug;

/// What the keyboard's status line shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySnapshot {
    /// State shown to the user.
    pub state: RecordingState,
    /// Elapsed recording time, when relevant.
    pub duration_seconds: f64,
    /// Error or hint text.
    pub message: Option<String>,
}

impl DisplaySnapshot {
    fn from_status(status: &RecordingStatus) -> Self {
        Self {
            state: status.state,
            duration_seconds: status.duration_seconds,
            message: status.error_message.clone(),
        }
    }
}

impl fmt::Display for DisplaySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.state, &self.message) {
            (RecordingState::Recording | RecordingState::Paused, _) => {
                write!(f, "{} {:.1}s", self.state, self.duration_seconds)
            }
            (RecordingState::Error, Some(message)) => write!(f, "Error: {}", message),
            (state, _) => write!(f, "{}", state),
        }
    }
}

struct Shown {
    snapshot: DisplaySnapshot,
    /// Bumped on every change; a grace timer only reverts its own generation.
    generation: u64,
}

/// The extension's own presentation state.
///
/// Mirrors the host status, except that a transient Completed or Error set
/// locally falls back to Idle after the grace period. Any newer change
/// cancels a pending fallback. Never written to the store.
#[derive(Clone)]
pub struct DisplayState {
    shown: Arc<Mutex<Shown>>,
    grace_period: Duration,
}

impl DisplayState {
    /// Start out showing Idle.
    pub fn new(grace_period: Duration) -> Self {
        Self {
            shown: Arc::new(Mutex::new(Shown {
                snapshot: DisplaySnapshot::default(),
                generation: 0,
            })),
            grace_period,
        }
    }

    /// What is shown right now.
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.lock().snapshot.clone()
    }

    /// Show a status observed from the host.
    pub fn show_status(&self, status: &RecordingStatus) {
        let mut shown = self.lock();
        shown.generation += 1;
        shown.snapshot = DisplaySnapshot::from_status(status);
    }

    /// Show `state` now and revert to Idle after the grace period.
    ///
    /// Must be called inside a tokio runtime.
    pub fn show_transient(&self, state: RecordingState, message: Option<String>) {
        let generation = {
            let mut shown = self.lock();
            shown.generation += 1;
            shown.snapshot = DisplaySnapshot {
                state,
                duration_seconds: 0.0,
                message,
            };
            shown.generation
        };

        let display = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(display.grace_period).await;

            let mut shown = display.lock();
            if shown.generation == generation {
                debug!(from = %shown.snapshot.state, "Grace period elapsed, showing Idle");
                shown.generation += 1;
                shown.snapshot = DisplaySnapshot::default();
            }
        });
    }

    /// Drop any pending fallback to Idle.
    pub fn cancel_grace(&self) {
        self.lock().generation += 1;
    }

    fn lock(&self) -> MutexGuard<'_, Shown> {
        self.shown.lock().unwrap_or_else(|e| e.into_inner())
    }
}
