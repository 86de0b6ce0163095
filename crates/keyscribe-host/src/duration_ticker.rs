use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;
use uuid::Uuid;

/// Periodic duration sampling for one recording session.
///
/// Each tick carries the session id it was started for. The task is aborted
/// when the ticker is dropped, which the event loop does on every exit from
/// Recording.
pub struct DurationTicker {
    session_id: Uuid,
    handle: JoinHandle<()>,
}

impl DurationTicker {
    /// Start sending `session_id` on `tick_tx` every `period`.
    pub fn start(session_id: Uuid, period: Duration, tick_tx: mpsc::Sender<Uuid>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the start already
            // published a zero duration.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tick_tx.send(session_id).await.is_err() {
                    break;
                }
            }
        });

        debug!(session_id = %session_id, period_ms = period.as_millis(), "Duration ticker started");

        Self { session_id, handle }
    }

    /// Session this ticker samples.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl Drop for DurationTicker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(session_id = %self.session_id, "Duration ticker stopped");
    }
}
