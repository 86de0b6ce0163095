use crate::{AppCommand, AppResult, DurationTicker, config::Config};

use keyscribe_core::{
    ActionOutcome, ActionReceiver, BridgeError, CaptureDevice, CoreResult, DeviceEvent,
    MicrophonePermission, RecordingService, RecordingState, SharedStore, StoppedSession, StoreKey,
    Transcription, TranscriptionClient, TranscriptionRequest,
};

use std::sync::Arc;

use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        mpsc, watch,
    },
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Host event loop.
///
/// Owns the recording state machine and wakes it from every trigger that
/// can mean a new action is waiting: change notifications, the fallback
/// poll, and the host coming to the foreground. Draining is idempotent, so
/// redundant wake-ups are harmless and a lost notification only costs
/// latency.
pub struct App<S, D, P> {
    pub(crate) service: RecordingService<S, D, P>,
    pub(crate) receiver: ActionReceiver<S>,
    pub(crate) transcriber: Arc<dyn TranscriptionClient>,
    pub(crate) config: Config,
    pub(crate) notifications: broadcast::Receiver<StoreKey>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) device_rx: mpsc::UnboundedReceiver<DeviceEvent>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<S, D, P> App<S, D, P>
where
    S: SharedStore,
    D: CaptureDevice,
    P: MicrophonePermission,
{
    /// Run the main application event loop until shutdown.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(
            store_dir = ?self.config.store.dir,
            recordings_dir = ?self.service.recordings_dir(),
            "KeyScribe host starting"
        );

        // Late-joining observers see a status right away.
        self.service.republish()?;
        // An action written while the host was not running is handled now.
        self.drain_actions();

        let (tick_tx, mut tick_rx) = mpsc::channel(16);
        let mut ticker: Option<DurationTicker> = None;
        let mut notifications_open = true;

        let mut poll = interval(self.config.channel.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        poll.tick().await;

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Foreground => {
                            debug!("Host foregrounded, checking for actions");
                            self.drain_actions();
                        }
                        AppCommand::TranscriptionFinished { session_id, result } => {
                            self.finish_transcription(session_id, result).await;
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                notification = self.notifications.recv(), if notifications_open => {
                    match notification {
                        Ok(StoreKey::PendingAction) => self.drain_actions(),
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Change notifications lagged, draining");
                            self.drain_actions();
                        }
                        Err(RecvError::Closed) => {
                            warn!("Change notifications closed, relying on polling");
                            notifications_open = false;
                        }
                    }
                }

                _ = poll.tick() => self.drain_actions(),

                Some(session_id) = tick_rx.recv() => {
                    if let Err(e) = self.service.tick(session_id) {
                        error!(session_id = %session_id, error = ?e, "Failed to publish duration");
                    }
                }

                Some(event) = self.device_rx.recv() => {
                    if let Err(e) = self.service.handle_device_event(event) {
                        error!(error = ?e, "Failed to apply device event");
                    }
                }
            }

            self.sync_ticker(&mut ticker, &tick_tx);
        }

        drop(ticker);
        let _ = self.shutdown_tx.send(true);
        info!(state = %self.service.state(), "KeyScribe host shut down");

        Ok(())
    }

    /// Take and apply the pending action, if one is waiting.
    fn drain_actions(&mut self) {
        let action = match self.receiver.drain() {
            Ok(Some(action)) => action,
            Ok(None) => return,
            Err(e @ (BridgeError::UnknownAction { .. } | BridgeError::RecordEncoding { .. })) => {
                warn!(error = %e, "Discarded unreadable action");
                return;
            }
            Err(e) => {
                error!(error = ?e, "Failed to drain pending action");
                return;
            }
        };

        info!(action = %action.action, origin = %action.origin, "Action received");

        match self.service.handle_action(&action) {
            Ok(ActionOutcome::Stopped(stopped)) => self.spawn_transcription(stopped),
            Ok(ActionOutcome::Failed(e)) => {
                warn!(message = %e.user_message(), "Action failed, status set to error");
            }
            Ok(outcome) => debug!(?outcome, "Action handled"),
            Err(e) => error!(error = ?e, "Failed to publish status"),
        }
    }

    /// Upload the finished recording in the background.
    ///
    /// The result comes back through `command_tx` so the state machine is
    /// only ever touched from the event loop.
    fn spawn_transcription(&self, stopped: StoppedSession) {
        let session_id = stopped.session_id;
        let request = TranscriptionRequest {
            audio_path: stopped.audio_path,
            prompt: stopped
                .prompt
                .or_else(|| self.config.transcription.prompt.clone()),
            user_id: self.config.transcription.user_id.clone(),
        };
        let transcriber = Arc::clone(&self.transcriber);
        let command_tx = self.command_tx.clone();

        tokio::spawn(async move {
            let start = std::time::Instant::now();
            let result = transcriber.transcribe(request).await;

            info!(
                session_id = %session_id,
                duration_ms = start.elapsed().as_millis(),
                success = result.is_ok(),
                "Transcription request finished"
            );

            if command_tx
                .send(AppCommand::TranscriptionFinished { session_id, result })
                .await
                .is_err()
            {
                warn!(session_id = %session_id, "Event loop gone, transcription result dropped");
            }
        });
    }

    async fn finish_transcription(&mut self, session_id: Uuid, result: CoreResult<Transcription>) {
        let audio_path = self.service.status().active_file_path.clone();

        match self.service.complete_transcription(session_id, result) {
            Ok(Some(_)) if !self.config.recording.keep_recordings => {
                if let Some(path) = audio_path {
                    match tokio::fs::remove_file(&path).await {
                        Ok(()) => debug!(path = ?path, "Recording removed"),
                        Err(e) => warn!(path = ?path, error = %e, "Failed to remove recording"),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => error!(session_id = %session_id, error = ?e, "Failed to publish transcription"),
        }
    }

    /// Keep exactly one ticker running while, and only while, recording.
    fn sync_ticker(&self, ticker: &mut Option<DurationTicker>, tick_tx: &mpsc::Sender<Uuid>) {
        let recording = match (self.service.state(), self.service.session_id()) {
            (RecordingState::Recording, Some(session_id)) => Some(session_id),
            _ => None,
        };

        match (recording, ticker.as_ref().map(DurationTicker::session_id)) {
            (Some(session_id), Some(current)) if session_id == current => {}
            (Some(session_id), _) => {
                *ticker = Some(DurationTicker::start(
                    session_id,
                    self.config.recording.duration_tick(),
                    tick_tx.clone(),
                ));
            }
            (None, Some(_)) => *ticker = None,
            (None, None) => {}
        }
    }
}
