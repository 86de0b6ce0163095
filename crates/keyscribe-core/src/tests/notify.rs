use crate::{ChangeNotifier, MemoryStore, SharedStore, StoreKey, StoreWatcher};

use std::time::Duration;

use tokio::sync::watch;

/// WHAT: The first sample reports keys that already hold a value
/// WHY: A record written before the watcher started still wakes the receiver
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_record_when_first_sample_then_key_reported() {
    // Given: An action already waiting
    let store = MemoryStore::new();
    store.set(StoreKey::PendingAction, "{}").unwrap();
    let mut watcher = StoreWatcher::new(
        store,
        vec![StoreKey::PendingAction, StoreKey::InsertionPayload],
        ChangeNotifier::new(),
    );

    // When: Sampling once
    let changed = watcher.sample();

    // Then: Only the present key is reported
    assert_eq!(changed, vec![StoreKey::PendingAction]);
}

/// WHAT: Unchanged values produce no change; writes and deletes do
/// WHY: Notifications should fire on real changes only
#[test]
#[allow(clippy::unwrap_used)]
fn given_sampled_store_when_value_changes_then_key_reported_once() {
    // Given: A watcher that has seen the current status
    let store = MemoryStore::new();
    store.set(StoreKey::RecordingStatus, "a").unwrap();
    let mut watcher = StoreWatcher::new(
        store.clone(),
        vec![StoreKey::RecordingStatus],
        ChangeNotifier::new(),
    );
    watcher.sample();

    // When/Then: No change, nothing reported
    assert!(watcher.sample().is_empty());

    // When/Then: Overwritten, reported once
    store.set(StoreKey::RecordingStatus, "b").unwrap();
    assert_eq!(watcher.sample(), vec![StoreKey::RecordingStatus]);
    assert!(watcher.sample().is_empty());

    // When/Then: Deleted, reported
    store.remove(StoreKey::RecordingStatus).unwrap();
    assert_eq!(watcher.sample(), vec![StoreKey::RecordingStatus]);
}

/// WHAT: An unreadable store produces no notifications
/// WHY: The watcher is best-effort and must not spin or crash
#[test]
fn given_unavailable_store_when_sampling_then_nothing_reported() {
    // Given: A revoked store
    let mut watcher = StoreWatcher::new(
        MemoryStore::unavailable(),
        vec![StoreKey::PendingAction],
        ChangeNotifier::new(),
    );

    // When/Then: Nothing reported
    assert!(watcher.sample().is_empty());
}

/// WHAT: The running watcher announces a write made through another handle
/// WHY: This is how the other process's writes become wake-ups
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_running_watcher_when_record_written_then_notified() {
    // Given: A running watcher with a subscriber
    let store = MemoryStore::new();
    let notifier = ChangeNotifier::new();
    let mut rx = notifier.subscribe();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let watcher = StoreWatcher::new(store.clone(), vec![StoreKey::PendingAction], notifier);
    let handle = tokio::spawn(watcher.run(Duration::from_millis(100), shutdown_rx));
    tokio::time::sleep(Duration::from_millis(150)).await;

    // When: Another handle writes an action
    store.set(StoreKey::PendingAction, "{}").unwrap();

    // Then: The key is announced within a tick
    let key = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(key, StoreKey::PendingAction);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

/// WHAT: Notifying with no subscribers is harmless
/// WHY: The host may publish before any observer exists
#[test]
fn given_no_subscribers_when_notifying_then_no_panic() {
    // Given/When: A notifier nobody listens to
    let notifier = ChangeNotifier::new();
    notifier.notify(StoreKey::RecordingStatus);

    // Then: A later subscriber sees only later notifications
    let mut rx = notifier.subscribe();
    assert!(rx.try_recv().is_err());
}
