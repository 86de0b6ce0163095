use crate::{DisplaySnapshot, DisplayState};

use keyscribe_core::{RecordingState, RecordingStatus};

use std::time::Duration;

const GRACE: Duration = Duration::from_millis(1500);

/// WHAT: A transient Completed falls back to Idle after the grace period
/// WHY: The keyboard must not keep showing a finished session forever
#[tokio::test(start_paused = true)]
async fn given_transient_completed_when_grace_elapses_then_idle() {
    // Given: Completed shown after an insertion
    let display = DisplayState::new(GRACE);
    display.show_transient(RecordingState::Completed, None);
    assert_eq!(display.snapshot().state, RecordingState::Completed);

    // When: Less than the grace period passes
    tokio::time::sleep(GRACE / 2).await;

    // Then: Still Completed
    assert_eq!(display.snapshot().state, RecordingState::Completed);

    // When: The grace period is over
    tokio::time::sleep(GRACE).await;

    // Then: Back to Idle
    assert_eq!(display.snapshot(), DisplaySnapshot::default());
}

/// WHAT: A host status arriving during the grace period cancels the fallback
/// WHY: A new session started right after an error must keep showing Recording
#[tokio::test(start_paused = true)]
async fn given_pending_grace_when_host_status_arrives_then_fallback_cancelled() {
    let display = DisplayState::new(GRACE);
    display.show_transient(RecordingState::Error, Some("permission denied".to_string()));

    display.show_status(&RecordingStatus {
        state: RecordingState::Recording,
        duration_seconds: 0.5,
        ..RecordingStatus::default()
    });
    tokio::time::sleep(GRACE * 2).await;

    let shown = display.snapshot();
    assert_eq!(shown.state, RecordingState::Recording);
    assert_eq!(shown.duration_seconds, 0.5);
}

/// WHAT: An explicit cancel keeps the transient state up
/// WHY: A successful key press replaces the error the user was looking at
#[tokio::test(start_paused = true)]
async fn given_pending_grace_when_cancelled_then_state_kept() {
    let display = DisplayState::new(GRACE);
    display.show_transient(RecordingState::Error, Some("no access".to_string()));

    display.cancel_grace();
    tokio::time::sleep(GRACE * 2).await;

    assert_eq!(display.snapshot().state, RecordingState::Error);
}

/// WHAT: A second transient restarts the grace period
/// WHY: Only the latest transient state may be reverted
#[tokio::test(start_paused = true)]
async fn given_two_transients_when_first_grace_elapses_then_second_still_shown() {
    let display = DisplayState::new(GRACE);
    display.show_transient(RecordingState::Completed, None);
    tokio::time::sleep(GRACE / 2).await;
    display.show_transient(RecordingState::Error, Some("paste failed".to_string()));

    tokio::time::sleep(GRACE * 3 / 4).await;
    assert_eq!(display.snapshot().state, RecordingState::Error);

    tokio::time::sleep(GRACE).await;
    assert_eq!(display.snapshot().state, RecordingState::Idle);
}

/// WHAT: The status line shows duration while recording and the message on error
/// WHY: These are the two states where the bare state name is not enough
#[test]
fn given_snapshots_when_formatting_then_duration_and_message_shown() {
    let recording = DisplaySnapshot {
        state: RecordingState::Recording,
        duration_seconds: 3.4,
        message: None,
    };
    let error = DisplaySnapshot {
        state: RecordingState::Error,
        duration_seconds: 0.0,
        message: Some("permission denied".to_string()),
    };

    assert_eq!(recording.to_string(), "Recording 3.4s");
    assert_eq!(error.to_string(), "Error: permission denied");
    assert_eq!(DisplaySnapshot::default().to_string(), "Idle");
}
