use crate::store::StoreKey;

use tokio::sync::broadcast;

/// Capacity of the wake-up channel. A lagging subscriber just misses
/// wake-ups, which polling covers.
const NOTIFY_CAPACITY: usize = 64;

/// In-process broadcast of "this key may have changed".
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<StoreKey>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    /// Create a notifier with no subscribers.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self { tx }
    }

    /// Announce a possible change to `key`. Dropped if nobody listens.
    pub fn notify(&self, key: StoreKey) {
        let _ = self.tx.send(key);
    }

    /// Receive future announcements.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreKey> {
        self.tx.subscribe()
    }
}
