//! Best-effort wake-ups layered over polling.
//!
//! Nothing depends on a notification being delivered: every receiver also
//! polls on a fixed interval and its drain routine is idempotent.

mod change_notifier;
mod store_watcher;

pub use {change_notifier::ChangeNotifier, store_watcher::StoreWatcher};
