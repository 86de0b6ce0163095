use crate::{notify::ChangeNotifier, store::SharedStore, store::StoreKey};

use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, instrument, trace};

/// Turns writes made by the other process into local notifications.
///
/// Samples the raw value of each watched key on a short interval and raises
/// the notifier for every key whose value differs from the previous sample.
pub struct StoreWatcher<S> {
    store: S,
    keys: Vec<StoreKey>,
    notifier: ChangeNotifier,
    last_seen: HashMap<StoreKey, Option<String>>,
}

impl<S: SharedStore> StoreWatcher<S> {
    /// Watch `keys` in `store`, announcing changes on `notifier`.
    pub fn new(store: S, keys: Vec<StoreKey>, notifier: ChangeNotifier) -> Self {
        Self {
            store,
            keys,
            notifier,
            last_seen: HashMap::new(),
        }
    }

    /// Take one sample and return the keys that changed since the last one.
    ///
    /// The first sample reports every key that currently holds a value.
    /// Keys that cannot be read are skipped and compared again next time.
    pub fn sample(&mut self) -> Vec<StoreKey> {
        let mut changed = Vec::new();

        for &key in &self.keys {
            let current = match self.store.get(key) {
                Ok(value) => value,
                Err(e) => {
                    trace!(key = %key, error = ?e, "Watcher could not read key");
                    continue;
                }
            };

            let previous = self.last_seen.get(&key).cloned().flatten();
            let first_sample = !self.last_seen.contains_key(&key);

            if (first_sample && current.is_some()) || (!first_sample && previous != current) {
                changed.push(key);
            }

            self.last_seen.insert(key, current);
        }

        changed
    }

    /// Sample every `period` until `shutdown_rx` changes.
    #[instrument(skip(self, shutdown_rx), fields(keys = ?self.keys))]
    pub async fn run(mut self, period: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!("Store watcher shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    for key in self.sample() {
                        trace!(key = %key, "Store key changed");
                        self.notifier.notify(key);
                    }
                }
            }
        }
    }
}
