//! Host-side recording state machine.
//!
//! ```text
//! Idle/Completed/Error --Start(ok)----------> Recording
//! Idle/Completed/Error --Start(fail)--------> Error
//! Recording            --Pause--------------> Paused
//! Paused               --Resume-------------> Recording
//! Recording/Paused     --Stop---------------> Processing
//! Recording            --device finished----> Completed
//! Recording            --device failed------> Error
//! Processing           --transcription ok---> Completed (+ insertion payload)
//! Processing           --transcription err--> Error
//! Processing           --delivery failed----> Error
//! ```
//!
//! Every transition overwrites the published status in one write. Actions
//! that are not valid in the current state are ignored, not errors.

use crate::{
    BridgeError, CoreResult,
    protocol::{ActionKind, InsertionPayload, PendingAction, RecordingState, RecordingStatus},
    recorder::{
        ActionOutcome, CaptureDevice, DeviceEvent, MicrophonePermission, PermissionStatus,
        StoppedSession, session::Session,
    },
    status::StatusPublisher,
    store::SharedStore,
    transcription::Transcription,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Parameter of a start action overriding the transcription prompt.
pub const PROMPT_PARAMETER: &str = "prompt";

/// File name for a session started at `started_at`.
///
/// Microsecond resolution keeps names unique across back-to-back sessions.
pub fn recording_file_name(started_at: DateTime<Utc>) -> String {
    format!("recording-{}.wav", started_at.format("%Y%m%d-%H%M%S-%6f"))
}

/// Owns the capture device and drives the recording lifecycle.
///
/// One instance per host process, constructed explicitly and handed to
/// whatever drives it.
pub struct RecordingService<S, D, P> {
    publisher: StatusPublisher<S>,
    device: D,
    permission: P,
    recordings_dir: PathBuf,
    status: RecordingStatus,
    session: Option<Session>,
}

impl<S, D, P> RecordingService<S, D, P>
where
    S: SharedStore,
    D: CaptureDevice,
    P: MicrophonePermission,
{
    /// Create an Idle machine. Nothing is published until the first
    /// transition or [`RecordingService::republish`].
    pub fn new(
        publisher: StatusPublisher<S>,
        device: D,
        permission: P,
        recordings_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            publisher,
            device,
            permission,
            recordings_dir: recordings_dir.into(),
            status: RecordingStatus::default(),
            session: None,
        }
    }

    /// Last status written (or about to be written) to the store.
    pub fn status(&self) -> &RecordingStatus {
        &self.status
    }

    /// Current state.
    pub fn state(&self) -> RecordingState {
        self.status.state
    }

    /// Id of the tracked session, if any.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Directory new recordings are written to.
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Dispatch a drained action.
    #[instrument(skip(self, action), fields(action = %action.action, state = %self.status.state))]
    pub fn handle_action(&mut self, action: &PendingAction) -> CoreResult<ActionOutcome> {
        match action.action {
            ActionKind::StartRecording => {
                self.start(action.parameter(PROMPT_PARAMETER).map(str::to_string))
            }
            ActionKind::PauseRecording => self.pause(),
            ActionKind::ResumeRecording => self.resume(),
            ActionKind::StopRecording => self.stop(),
            ActionKind::CheckStatus => {
                self.republish()?;
                Ok(ActionOutcome::Republished)
            }
        }
    }

    /// Publish the current status again, e.g. for a late-joining observer.
    pub fn republish(&mut self) -> CoreResult<()> {
        if self.status.state == RecordingState::Recording {
            self.sample_duration();
        }
        self.publish()
    }

    /// Refresh the published duration of a recording session.
    ///
    /// Returns `false` (and publishes nothing) when `session_id` is not the
    /// session currently recording, so a late tick from a finished session
    /// cannot touch a newer one.
    pub fn tick(&mut self, session_id: Uuid) -> CoreResult<bool> {
        if self.status.state != RecordingState::Recording || self.session_id() != Some(session_id)
        {
            return Ok(false);
        }

        self.sample_duration();
        self.publish()?;
        Ok(true)
    }

    /// Apply an event raised by the capture device.
    #[instrument(skip(self), fields(state = %self.status.state))]
    pub fn handle_device_event(&mut self, event: DeviceEvent) -> CoreResult<()> {
        if self.session_id() != Some(event.session_id()) || !self.status.state.holds_device() {
            debug!("Device event for a session no longer recording, ignored");
            return Ok(());
        }

        match event {
            DeviceEvent::Finished { session_id } => {
                if self.status.state != RecordingState::Recording {
                    return Ok(());
                }
                self.freeze_duration();
                match self.device.finish() {
                    Ok(path) => {
                        info!(session_id = %session_id, path = ?path, "Device finished recording");
                        self.status.active_file_path = Some(path);
                        self.transition(RecordingState::Completed, None)
                    }
                    Err(e) => self.fail(e).map(|_| ()),
                }
            }
            DeviceEvent::Failed { reason, .. } => self
                .fail(BridgeError::DeviceError {
                    reason,
                    location: ErrorLocation::from(Location::caller()),
                })
                .map(|_| ()),
        }
    }

    /// Apply the transcription result for `session_id`.
    ///
    /// Returns the insertion payload that was published on success. Results
    /// for a session that is not the one being processed are dropped.
    #[instrument(skip(self, result), fields(state = %self.status.state))]
    pub fn complete_transcription(
        &mut self,
        session_id: Uuid,
        result: CoreResult<Transcription>,
    ) -> CoreResult<Option<InsertionPayload>> {
        if self.status.state != RecordingState::Processing || self.session_id() != Some(session_id)
        {
            warn!(session_id = %session_id, "Transcription result for an untracked session, dropped");
            return Ok(None);
        }

        match result {
            Ok(transcription) => {
                let payload = InsertionPayload::new(transcription.final_text, session_id);
                if let Err(e) = self.publisher.publish_insertion(&payload) {
                    // The result arrives once; Processing must not outlive it.
                    self.fail(e)?;
                    return Ok(None);
                }
                info!(
                    session_id = %session_id,
                    text_len = payload.text.len(),
                    "Transcription delivered"
                );
                self.transition(RecordingState::Completed, None)?;
                Ok(Some(payload))
            }
            Err(e) => {
                self.fail(e)?;
                Ok(None)
            }
        }
    }

    fn start(&mut self, prompt: Option<String>) -> CoreResult<ActionOutcome> {
        if !self.status.state.accepts_start() {
            return self.ignore();
        }

        // A failed start must not report the previous session.
        self.clear_session();

        let permission = match self.permission.status() {
            PermissionStatus::Undetermined => self.permission.request(),
            status => status,
        };
        if permission != PermissionStatus::Granted {
            return self.fail(BridgeError::PermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // The device is singly owned: whatever a previous session left
        // behind must be gone before acquiring again.
        if self.device.is_held() {
            warn!("Capture device still held at start, releasing");
            self.device.release();
        }

        let path = self.recordings_dir.join(recording_file_name(Utc::now()));
        let session = Session::start(path, prompt);

        if let Err(e) = self.device.acquire(session.id, &session.file_path) {
            return self.fail(e);
        }

        let session_id = session.id;
        self.status = RecordingStatus {
            state: RecordingState::Recording,
            duration_seconds: 0.0,
            active_file_path: Some(session.file_path.clone()),
            error_message: None,
            session_id: Some(session_id),
            updated_at: Utc::now(),
        };
        self.session = Some(session);
        self.publish()?;

        info!(session_id = %session_id, "Recording started");
        Ok(ActionOutcome::Started { session_id })
    }

    fn pause(&mut self) -> CoreResult<ActionOutcome> {
        if self.status.state != RecordingState::Recording {
            return self.ignore();
        }

        if let Err(e) = self.device.pause() {
            return self.fail(e);
        }

        self.freeze_duration();
        self.transition(RecordingState::Paused, None)?;
        Ok(ActionOutcome::Paused)
    }

    fn resume(&mut self) -> CoreResult<ActionOutcome> {
        if self.status.state != RecordingState::Paused {
            return self.ignore();
        }

        if let Err(e) = self.device.resume() {
            return self.fail(e);
        }

        let Some(session) = self.session.as_mut() else {
            return self.ignore();
        };
        session.resume();
        let session_id = session.id;

        self.transition(RecordingState::Recording, None)?;
        Ok(ActionOutcome::Resumed { session_id })
    }

    fn stop(&mut self) -> CoreResult<ActionOutcome> {
        if !self.status.state.holds_device() {
            return self.ignore();
        }

        self.freeze_duration();

        let audio_path = match self.device.finish() {
            Ok(path) => path,
            Err(e) => return self.fail(e),
        };

        let Some(session) = self.session.as_ref() else {
            return self.ignore();
        };
        let stopped = StoppedSession {
            session_id: session.id,
            audio_path: audio_path.clone(),
            prompt: session.prompt.clone(),
        };

        self.status.active_file_path = Some(audio_path);
        // The transcription must still run; a later publish repairs the status.
        if let Err(e) = self.transition(RecordingState::Processing, None) {
            error!(session_id = %stopped.session_id, error = ?e, "Failed to publish Processing");
        }

        info!(
            session_id = %stopped.session_id,
            duration_seconds = self.status.duration_seconds,
            "Recording stopped, awaiting transcription"
        );
        Ok(ActionOutcome::Stopped(stopped))
    }

    fn ignore(&self) -> CoreResult<ActionOutcome> {
        debug!(state = %self.status.state, "Action not valid in current state, ignored");
        Ok(ActionOutcome::Ignored {
            state: self.status.state,
        })
    }

    /// Move to Error, releasing the device, and publish the message.
    fn fail(&mut self, err: BridgeError) -> CoreResult<ActionOutcome> {
        error!(error = ?err, state = %self.status.state, "Recording failed");

        self.device.release();
        self.freeze_duration();

        let message = err.user_message();
        self.transition(RecordingState::Error, Some(message))?;
        Ok(ActionOutcome::Failed(err))
    }

    fn transition(&mut self, state: RecordingState, error_message: Option<String>) -> CoreResult<()> {
        debug!(from = %self.status.state, to = %state, "State transition");
        self.status.state = state;
        self.status.error_message = error_message;
        self.publish()
    }

    fn clear_session(&mut self) {
        self.session = None;
        self.status.session_id = None;
        self.status.active_file_path = None;
        self.status.duration_seconds = 0.0;
    }

    fn sample_duration(&mut self) {
        if let Some(session) = &self.session {
            self.status.duration_seconds = session.elapsed().as_secs_f64();
        }
    }

    fn freeze_duration(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.freeze();
            self.status.duration_seconds = session.elapsed().as_secs_f64();
        }
    }

    fn publish(&mut self) -> CoreResult<()> {
        self.status.updated_at = Utc::now();
        self.publisher.publish(&self.status)
    }
}
