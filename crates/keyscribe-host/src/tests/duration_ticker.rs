use crate::DurationTicker;

use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;

/// WHAT: Ticks carry the session id and stop when the ticker is dropped
/// WHY: A finished session must not keep refreshing the published duration
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_running_ticker_when_dropped_then_ticks_stop() {
    // Given: A ticker for one session
    let (tick_tx, mut tick_rx) = mpsc::channel(4);
    let session_id = Uuid::new_v4();
    let ticker = DurationTicker::start(session_id, Duration::from_millis(100), tick_tx);
    assert_eq!(ticker.session_id(), session_id);

    // When: Two periods pass
    let first = tick_rx.recv().await.unwrap();
    let second = tick_rx.recv().await.unwrap();

    // Then: Both ticks name the session
    assert_eq!(first, session_id);
    assert_eq!(second, session_id);

    // When: The ticker is dropped
    drop(ticker);

    // Then: The channel closes instead of ticking again
    assert!(tick_rx.recv().await.is_none());
}

/// WHAT: The first tick arrives one period after start, not immediately
/// WHY: Start already publishes a zero duration
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_new_ticker_when_started_then_first_tick_after_one_period() {
    let (tick_tx, mut tick_rx) = mpsc::channel(4);
    let started = tokio::time::Instant::now();
    let _ticker = DurationTicker::start(Uuid::new_v4(), Duration::from_millis(250), tick_tx);

    tick_rx.recv().await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(250));
}
