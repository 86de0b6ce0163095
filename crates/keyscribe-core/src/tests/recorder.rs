use crate::{
    ActionKind, ActionOutcome, BridgeError, DeviceEvent, MemoryStore, PendingAction,
    PermissionStatus, RecordingState, RecordingStatus, SharedStore, StatusObserver, StoreKey,
    Transcription, read_record, recording_file_name,
    tests::fakes::{FakeDevice, FakePermission, FakeService, service, service_with_permission},
};

use std::{collections::BTreeMap, panic::Location, time::Duration};

use chrono::{TimeDelta, Utc};
use error_location::ErrorLocation;
use uuid::Uuid;

fn action(kind: ActionKind) -> PendingAction {
    PendingAction::new(kind, BTreeMap::new())
}

#[allow(clippy::unwrap_used)]
fn published(store: &MemoryStore) -> RecordingStatus {
    read_record(store, StoreKey::RecordingStatus).unwrap().unwrap()
}

#[allow(clippy::unwrap_used)]
fn start(service: &mut FakeService) -> Uuid {
    match service.handle_action(&action(ActionKind::StartRecording)).unwrap() {
        ActionOutcome::Started { session_id } => session_id,
        other => unreachable!("expected Started, got {:?}", other),
    }
}

#[allow(clippy::unwrap_used)]
fn stop(service: &mut FakeService) -> Uuid {
    match service.handle_action(&action(ActionKind::StopRecording)).unwrap() {
        ActionOutcome::Stopped(stopped) => stopped.session_id,
        other => unreachable!("expected Stopped, got {:?}", other),
    }
}

fn transcription(text: &str) -> Transcription {
    Transcription {
        raw_text: text.to_lowercase(),
        final_text: text.to_string(),
        duration_seconds: 1.0,
        prompt_used: None,
    }
}

/// WHAT: Start from Idle acquires the device and publishes Recording
/// WHY: The extension learns about a new session only through the store
#[test]
fn given_idle_when_start_then_recording_published_with_fresh_session() {
    // Given: An idle service
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());

    // When: Handling a start action
    let session_id = start(&mut service);

    // Then: Device is held and Recording is published for that session
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Recording);
    assert_eq!(status.duration_seconds, 0.0);
    assert_eq!(status.session_id, Some(session_id));
    assert!(status.active_file_path.is_some());
    assert!(status.error_message.is_none());
    assert_eq!(device.log().acquisitions, 1);
    assert!(device.log().held.is_some());
}

/// WHAT: Undetermined permission is requested and a denial ends in Error
/// WHY: The user must see why recording did not start
#[test]
fn given_undetermined_permission_when_start_denied_then_error_permission_denied() {
    // Given: Permission not yet asked, answer will be Denied
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let permission = FakePermission::new(PermissionStatus::Undetermined, PermissionStatus::Denied);
    let mut service = service_with_permission(&store, device.clone(), permission.clone());

    // When: Handling a start action
    let outcome = service
        .handle_action(&action(ActionKind::StartRecording))
        .unwrap_or_else(|e| unreachable!("store error: {e}"));

    // Then: Permission was requested, device untouched, Error published
    assert!(matches!(
        outcome,
        ActionOutcome::Failed(BridgeError::PermissionDenied { .. })
    ));
    assert_eq!(permission.request_count(), 1);
    assert_eq!(device.log().acquisitions, 0);
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Error);
    assert_eq!(status.error_message.as_deref(), Some("permission denied"));
}

/// WHAT: Granted-on-request permission proceeds to recording
/// WHY: First use of the microphone must not need a second tap
#[test]
fn given_undetermined_permission_when_start_granted_then_recording() {
    // Given: Permission not yet asked, answer will be Granted
    let store = MemoryStore::new();
    let permission = FakePermission::new(PermissionStatus::Undetermined, PermissionStatus::Granted);
    let mut service = service_with_permission(&store, FakeDevice::default(), permission.clone());

    // When: Starting
    start(&mut service);

    // Then: Recording after exactly one request
    assert_eq!(permission.request_count(), 1);
    assert_eq!(service.state(), RecordingState::Recording);
}

/// WHAT: Device acquisition failure moves to Error with a message
/// WHY: Failures are recovered into the Error state, never crash the host
#[test]
fn given_missing_microphone_when_start_then_error_with_message() {
    // Given: A device that cannot be acquired
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::failing());

    // When: Starting
    let outcome = service
        .handle_action(&action(ActionKind::StartRecording))
        .unwrap_or_else(|e| unreachable!("store error: {e}"));

    // Then: Error published with the reason
    assert!(matches!(
        outcome,
        ActionOutcome::Failed(BridgeError::DeviceAcquisitionFailed { .. })
    ));
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Error);
    assert!(
        status
            .error_message
            .unwrap_or_default()
            .contains("no microphone found")
    );
}

/// WHAT: Pause and resume are no-ops outside their source states
/// WHY: Stale or repeated intents must not corrupt the session
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_when_pause_or_resume_then_ignored_and_nothing_published() {
    // Given: An idle service that has published nothing
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());

    // When: Pausing, resuming and stopping
    let pause = service.handle_action(&action(ActionKind::PauseRecording)).unwrap();
    let resume = service.handle_action(&action(ActionKind::ResumeRecording)).unwrap();
    let stop = service.handle_action(&action(ActionKind::StopRecording)).unwrap();

    // Then: All ignored, store untouched
    for outcome in [pause, resume, stop] {
        assert!(matches!(
            outcome,
            ActionOutcome::Ignored {
                state: RecordingState::Idle
            }
        ));
    }
    assert!(store.is_empty());
}

/// WHAT: Resume while recording is ignored
/// WHY: Resume is only valid from Paused
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_resume_then_ignored() {
    // Given: A recording session
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    start(&mut service);

    // When: Resuming
    let outcome = service.handle_action(&action(ActionKind::ResumeRecording)).unwrap();

    // Then: Ignored, still recording
    assert!(matches!(outcome, ActionOutcome::Ignored { .. }));
    assert_eq!(published(&store).state, RecordingState::Recording);
}

/// WHAT: Pause, resume and stop walk through Paused, Recording and Processing
/// WHY: Stop must release the device before transcription starts
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_pause_resume_stop_then_processing_and_device_released() {
    // Given: A recording session
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());
    let session_id = start(&mut service);

    // When: Pausing
    service.handle_action(&action(ActionKind::PauseRecording)).unwrap();

    // Then: Paused published, device paused
    assert_eq!(published(&store).state, RecordingState::Paused);
    assert!(device.log().paused);

    // When: Resuming
    let resumed = service.handle_action(&action(ActionKind::ResumeRecording)).unwrap();

    // Then: Same session recording again
    assert!(matches!(resumed, ActionOutcome::Resumed { session_id: id } if id == session_id));
    assert_eq!(published(&store).state, RecordingState::Recording);

    // When: Stopping
    let stopped = stop(&mut service);

    // Then: Processing published, device released with the file finished
    assert_eq!(stopped, session_id);
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Processing);
    assert!(device.log().held.is_none());
    assert_eq!(device.log().finished.len(), 1);
    assert_eq!(status.active_file_path.as_ref(), device.log().finished.first());
}

/// WHAT: Stop from Paused is accepted
/// WHY: Users often pause and then decide they are done
#[test]
#[allow(clippy::unwrap_used)]
fn given_paused_when_stop_then_processing() {
    // Given: A paused session
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    start(&mut service);
    service.handle_action(&action(ActionKind::PauseRecording)).unwrap();

    // When: Stopping
    stop(&mut service);

    // Then: Processing
    assert_eq!(published(&store).state, RecordingState::Processing);
}

/// WHAT: Stop and start during Processing are no-ops
/// WHY: The device is already released; only the transcription result resolves Processing
#[test]
#[allow(clippy::unwrap_used)]
fn given_processing_when_stop_or_start_then_ignored() {
    // Given: A session waiting for transcription
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());
    start(&mut service);
    stop(&mut service);

    // When: Stopping and starting again
    let stop_again = service.handle_action(&action(ActionKind::StopRecording)).unwrap();
    let start_again = service.handle_action(&action(ActionKind::StartRecording)).unwrap();

    // Then: Both ignored, no new acquisition
    assert!(matches!(stop_again, ActionOutcome::Ignored { state: RecordingState::Processing }));
    assert!(matches!(start_again, ActionOutcome::Ignored { state: RecordingState::Processing }));
    assert_eq!(device.log().acquisitions, 1);
    assert_eq!(published(&store).state, RecordingState::Processing);
}

/// WHAT: Successful transcription publishes the payload and completes
/// WHY: This is the only path that delivers text to the extension
#[test]
#[allow(clippy::unwrap_used)]
fn given_processing_when_transcription_succeeds_then_completed_with_payload() {
    // Given: A stopped session
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    start(&mut service);
    let session_id = stop(&mut service);

    // When: The transcription arrives
    let payload = service
        .complete_transcription(session_id, Ok(transcription("Hello world.")))
        .unwrap();

    // Then: Completed published and payload readable exactly once
    assert_eq!(payload.map(|p| p.text).as_deref(), Some("Hello world."));
    assert_eq!(published(&store).state, RecordingState::Completed);
    let observer = StatusObserver::new(store.clone());
    assert_eq!(
        observer.drain_insertion_payload().unwrap().as_deref(),
        Some("Hello world.")
    );
    assert!(observer.drain_insertion_payload().unwrap().is_none());
}

/// WHAT: Failed transcription moves to Error with the failure message
/// WHY: The extension shows why no text arrived
#[test]
#[allow(clippy::unwrap_used)]
fn given_processing_when_transcription_fails_then_error_and_no_payload() {
    // Given: A stopped session
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    start(&mut service);
    let session_id = stop(&mut service);

    // When: The transcription fails
    let failure = Err(BridgeError::TranscriptionFailed {
        reason: "server returned 503".to_string(),
        location: ErrorLocation::from(Location::caller()),
    });
    let payload = service.complete_transcription(session_id, failure).unwrap();

    // Then: Error with the message, nothing to insert
    assert!(payload.is_none());
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Error);
    assert_eq!(status.error_message.as_deref(), Some("server returned 503"));
    assert!(store.get(StoreKey::InsertionPayload).unwrap().is_none());
}

/// WHAT: A transcription result for another session is dropped
/// WHY: Only the currently tracked recording may produce an insertion
#[test]
#[allow(clippy::unwrap_used)]
fn given_processing_when_result_for_other_session_then_dropped() {
    // Given: A stopped session
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    start(&mut service);
    stop(&mut service);

    // When: A result for an unknown session arrives
    let payload = service
        .complete_transcription(Uuid::new_v4(), Ok(transcription("stale")))
        .unwrap();

    // Then: Nothing published, still processing
    assert!(payload.is_none());
    assert_eq!(published(&store).state, RecordingState::Processing);
    assert!(store.get(StoreKey::InsertionPayload).unwrap().is_none());
}

/// WHAT: Start is accepted from Completed and from Error
/// WHY: A finished or failed session can be followed by a new one without an explicit reset
#[test]
#[allow(clippy::unwrap_used)]
fn given_completed_or_error_when_start_then_new_session_recording() {
    // Given: A completed session
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());
    let first = start(&mut service);
    let first_id = stop(&mut service);
    service
        .complete_transcription(first_id, Ok(transcription("one")))
        .unwrap();
    assert_eq!(service.state(), RecordingState::Completed);

    // When: Starting again
    let second = start(&mut service);

    // Then: New session, fresh duration
    assert_ne!(first, second);
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Recording);
    assert_eq!(status.duration_seconds, 0.0);

    // Given: That session fails
    service
        .handle_device_event(DeviceEvent::Failed {
            session_id: second,
            reason: "device unplugged".to_string(),
        })
        .unwrap();
    assert_eq!(service.state(), RecordingState::Error);

    // When: Starting again (retry)
    let third = start(&mut service);

    // Then: Recording again with the error cleared
    assert_ne!(second, third);
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Recording);
    assert!(status.error_message.is_none());
    assert_eq!(device.log().acquisitions, 3);
}

/// WHAT: Device failure releases the device and publishes Error
/// WHY: The next start must be able to acquire the device again
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_device_fails_then_error_and_released() {
    // Given: A recording session
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());
    let session_id = start(&mut service);

    // When: The device reports a failure
    service
        .handle_device_event(DeviceEvent::Failed {
            session_id,
            reason: "stream disconnected".to_string(),
        })
        .unwrap();

    // Then: Error published, device released
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Error);
    assert!(status.error_message.unwrap_or_default().contains("stream disconnected"));
    assert!(device.log().held.is_none());
    assert_eq!(device.log().releases, 1);
}

/// WHAT: Device finishing on its own completes the session
/// WHY: Reaching the maximum duration is a successful recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_device_finishes_then_completed() {
    // Given: A recording session
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());
    let session_id = start(&mut service);

    // When: The device reports it finished
    service
        .handle_device_event(DeviceEvent::Finished { session_id })
        .unwrap();

    // Then: Completed with the finished file
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Completed);
    assert_eq!(device.log().finished.len(), 1);
    assert!(device.log().held.is_none());
}

/// WHAT: Device events from another session are ignored
/// WHY: A late callback must not end a newer session
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_event_for_other_session_then_ignored() {
    // Given: A recording session
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    start(&mut service);

    // When: A failure for a different session arrives
    service
        .handle_device_event(DeviceEvent::Failed {
            session_id: Uuid::new_v4(),
            reason: "old stream".to_string(),
        })
        .unwrap();

    // Then: Still recording
    assert_eq!(published(&store).state, RecordingState::Recording);
}

/// WHAT: Duration grows while recording and freezes while paused
/// WHY: Duration is non-decreasing within a session and excludes paused time
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_time_passes_then_duration_excludes_pauses() {
    // Given: A recording session
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    let session_id = start(&mut service);

    // When: Two seconds pass and the ticker fires
    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(service.tick(session_id).unwrap());

    // Then: Duration reflects it
    let first = published(&store).duration_seconds;
    assert!((first - 2.0).abs() < 0.01);

    // When: Paused for five seconds, then resumed for one
    service.handle_action(&action(ActionKind::PauseRecording)).unwrap();
    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(!service.tick(session_id).unwrap());
    let paused = published(&store).duration_seconds;
    service.handle_action(&action(ActionKind::ResumeRecording)).unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;
    service.tick(session_id).unwrap();

    // Then: Paused time is excluded and the value never went down
    let resumed = published(&store).duration_seconds;
    assert!(paused >= first);
    assert!(resumed >= paused);
    assert!((resumed - 3.0).abs() < 0.01);

    // When: Stopped, delivered, and a new session started
    stop(&mut service);
    let frozen = published(&store).duration_seconds;
    service
        .complete_transcription(session_id, Ok(transcription("x")))
        .unwrap();
    start(&mut service);

    // Then: Stop froze the value, the new session starts from zero
    assert!((frozen - 3.0).abs() < 0.01);
    assert_eq!(published(&store).duration_seconds, 0.0);
}

/// WHAT: A tick tagged with a finished session is ignored
/// WHY: A stale timer must not overwrite a newer session's duration
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_new_session_when_stale_tick_arrives_then_ignored() {
    // Given: A first session that failed and a second one recording
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    let old = start(&mut service);
    tokio::time::advance(Duration::from_secs(4)).await;
    service
        .handle_device_event(DeviceEvent::Failed {
            session_id: old,
            reason: "glitch".to_string(),
        })
        .unwrap();
    let current = start(&mut service);

    // When: A tick for the old session arrives
    let applied = service.tick(old).unwrap();

    // Then: Ignored; the new session still reports zero
    assert!(!applied);
    assert_ne!(old, current);
    assert_eq!(published(&store).duration_seconds, 0.0);
}

/// WHAT: CheckStatus re-publishes without a transition
/// WHY: An extension that attached late must see the current state
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_check_status_then_status_republished() {
    // Given: A recording session whose status record was lost
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());
    let session_id = start(&mut service);
    store.remove(StoreKey::RecordingStatus).unwrap();

    // When: Handling CheckStatus
    let outcome = service.handle_action(&action(ActionKind::CheckStatus)).unwrap();

    // Then: Same state published again, device untouched
    assert!(matches!(outcome, ActionOutcome::Republished));
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Recording);
    assert_eq!(status.session_id, Some(session_id));
    assert_eq!(device.log().acquisitions, 1);
}

/// WHAT: Session file names differ for starts a microsecond apart
/// WHY: A new session must never overwrite an earlier recording
#[test]
fn given_close_start_times_when_naming_files_then_names_differ() {
    // Given: Two start times one microsecond apart
    let first = Utc::now();
    let second = first + TimeDelta::microseconds(1);

    // When: Naming the files
    let a = recording_file_name(first);
    let b = recording_file_name(second);

    // Then: Distinct WAV names
    assert_ne!(a, b);
    assert!(a.starts_with("recording-") && a.ends_with(".wav"));
}

/// WHAT: Stop still hands off the recording when the Processing write fails
/// WHY: Without the hand-off nothing ever ends Processing and every later start is ignored
#[test]
#[allow(clippy::unwrap_used)]
fn given_store_revoked_when_stop_then_session_still_handed_off() {
    // Given: A recording session and a store that stops accepting writes
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    let session_id = start(&mut service);
    store.set_available(false);

    // When: Stopping
    let outcome = service.handle_action(&action(ActionKind::StopRecording));

    // Then: The stopped session is returned for transcription
    match outcome {
        Ok(ActionOutcome::Stopped(stopped)) => assert_eq!(stopped.session_id, session_id),
        other => unreachable!("expected Stopped, got {:?}", other),
    }
    assert_eq!(service.state(), RecordingState::Processing);

    // When: Access returns and the result arrives
    store.set_available(true);
    service
        .complete_transcription(session_id, Ok(transcription("Hello world.")))
        .unwrap();

    // Then: Completed is published and a new session can start
    assert_eq!(published(&store).state, RecordingState::Completed);
    start(&mut service);
    assert_eq!(service.state(), RecordingState::Recording);
}

/// WHAT: A transcription that cannot be delivered ends in Error
/// WHY: The result does not arrive twice, so Processing must not outlive it
#[test]
#[allow(clippy::unwrap_used)]
fn given_store_revoked_when_transcription_delivered_then_error_not_processing() {
    // Given: A processing session and a store that stops accepting writes
    let store = MemoryStore::new();
    let mut service = service(&store, FakeDevice::default());
    start(&mut service);
    let session_id = stop(&mut service);
    store.set_available(false);

    // When: The result arrives
    let result = service.complete_transcription(session_id, Ok(transcription("Hello world.")));

    // Then: The machine left Processing and no payload was reported
    assert!(result.is_err());
    assert_eq!(service.state(), RecordingState::Error);

    // When: Access returns and the status is republished
    store.set_available(true);
    service.republish().unwrap();

    // Then: Error is visible, nothing is waiting for insertion, start works again
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Error);
    assert!(status.error_message.is_some());
    assert!(store.get(StoreKey::InsertionPayload).unwrap().is_none());
    start(&mut service);
    assert_eq!(service.state(), RecordingState::Recording);
}

/// WHAT: A failed start does not report the previous session
/// WHY: The Error status must describe the attempt that failed
#[test]
fn given_completed_session_when_acquire_fails_then_error_without_old_session() {
    // Given: A session that recorded and completed, then the microphone disappears
    let store = MemoryStore::new();
    let device = FakeDevice::default();
    let mut service = service(&store, device.clone());
    let old = start(&mut service);
    stop(&mut service);
    service
        .complete_transcription(old, Ok(transcription("done")))
        .unwrap_or_else(|e| unreachable!("store error: {e}"));
    device.log().fail_acquire = true;

    // When: Starting again
    let outcome = service
        .handle_action(&action(ActionKind::StartRecording))
        .unwrap_or_else(|e| unreachable!("store error: {e}"));

    // Then: Error carries no session, file, or duration from the old one
    assert!(matches!(
        outcome,
        ActionOutcome::Failed(BridgeError::DeviceAcquisitionFailed { .. })
    ));
    let status = published(&store);
    assert_eq!(status.state, RecordingState::Error);
    assert_eq!(status.session_id, None);
    assert_eq!(status.active_file_path, None);
    assert_eq!(status.duration_seconds, 0.0);
    assert_eq!(service.session_id(), None);
}
