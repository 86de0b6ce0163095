use crate::{Controls, DisplaySnapshot, DisplayState, KeyInput, KeyboardResult, TextInserter};

use keyscribe_core::{RecordingState, SharedStore, StatusObserver, StoreKey};

use std::time::Duration;

use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        mpsc,
    },
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, error, info, instrument, warn};

/// A loaded keyboard: control keys, the status line and text insertion.
///
/// Status and insertion slots are checked at load, on every change
/// notification and on the fallback poll. Draining the insertion slot is a
/// consuming read, so the same text is never inserted twice however many of
/// those triggers fire.
pub struct KeyboardSession<S, I> {
    pub(crate) controls: Controls<S>,
    pub(crate) observer: StatusObserver<S>,
    pub(crate) inserter: I,
    pub(crate) display: DisplayState,
    pub(crate) notifications: broadcast::Receiver<StoreKey>,
    pub(crate) poll_interval: Duration,
    pub(crate) last_printed: Option<DisplaySnapshot>,
}

impl<S, I> KeyboardSession<S, I>
where
    S: SharedStore + Clone,
    I: TextInserter,
{
    /// Run until `Quit` is pressed or the key channel closes.
    #[instrument(skip(self, keys))]
    pub async fn run(mut self, mut keys: mpsc::Receiver<KeyInput>) -> KeyboardResult<()> {
        info!("Keyboard loaded");

        // Text delivered while the keyboard was hidden is inserted now.
        self.refresh().await;

        let mut notifications_open = true;
        let mut poll = interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        poll.tick().await;

        loop {
            tokio::select! {
                key = keys.recv() => {
                    match key {
                        Some(KeyInput::Press { action, parameters }) => {
                            if let Err(e) = self.controls.press(action, parameters) {
                                debug!(error = ?e, "Key press not delivered");
                            }
                            self.print();
                        }
                        Some(KeyInput::Quit) | None => {
                            info!("Keyboard dismissed");
                            break;
                        }
                    }
                }

                notification = self.notifications.recv(), if notifications_open => {
                    match notification {
                        Ok(StoreKey::RecordingStatus | StoreKey::InsertionPayload) => {
                            self.refresh().await;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(_)) => self.refresh().await,
                        Err(RecvError::Closed) => {
                            warn!("Change notifications closed, relying on polling");
                            notifications_open = false;
                        }
                    }
                }

                _ = poll.tick() => self.refresh().await,
            }
        }

        Ok(())
    }

    /// Pick up a new host status and any text waiting to be inserted.
    pub(crate) async fn refresh(&mut self) {
        match self.observer.poll() {
            Ok(Some(status)) => {
                self.display.show_status(&status);
                self.print();
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Status not readable"),
        }

        match self.observer.drain_insertion_payload() {
            Ok(Some(text)) => self.insert(&text).await,
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Insertion payload not readable"),
        }
    }

    async fn insert(&mut self, text: &str) {
        match self.inserter.insert(text).await {
            Ok(()) => {
                info!(text_len = text.len(), "Transcription inserted");
                self.display.show_transient(RecordingState::Completed, None);
            }
            Err(e) => {
                error!(error = ?e, "Failed to insert transcription");
                self.display
                    .show_transient(RecordingState::Error, Some(e.user_message()));
            }
        }
        self.print();
    }

    /// Print the status line if it changed since it was last printed.
    fn print(&mut self) {
        let snapshot = self.display.snapshot();
        if self.last_printed.as_ref() == Some(&snapshot) {
            return;
        }
        println!("{}", snapshot);
        self.last_printed = Some(snapshot);
    }
}
