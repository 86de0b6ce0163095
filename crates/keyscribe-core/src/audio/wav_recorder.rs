use crate::{
    BridgeError, CoreResult,
    recorder::{CaptureDevice, DeviceEvent},
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Flags shared between the recorder and the audio callback.
#[derive(Debug, Default)]
struct CaptureFlags {
    /// Set before the stream is dropped so no late callback writes.
    shutdown: AtomicBool,
    paused: AtomicBool,
    /// Set once the first finished/failed event has been sent.
    reported: AtomicBool,
}

struct ActiveCapture {
    session_id: Uuid,
    path: PathBuf,
    stream: Stream,
    samples: Arc<Mutex<Vec<f32>>>,
    flags: Arc<CaptureFlags>,
    sample_rate: u32,
}

/// Records the default input device into a 16-bit mono WAV file.
///
/// Audio is buffered in memory and written when the session finishes.
/// Reaching the maximum duration ends the recording and raises
/// [`DeviceEvent::Finished`]; stream errors raise [`DeviceEvent::Failed`].
pub struct WavRecorder {
    max_duration: Duration,
    events: mpsc::UnboundedSender<DeviceEvent>,
    active: Option<ActiveCapture>,
}

impl WavRecorder {
    /// Create a recorder that reports device events on `events`.
    pub fn new(max_duration: Duration, events: mpsc::UnboundedSender<DeviceEvent>) -> Self {
        Self {
            max_duration,
            events,
            active: None,
        }
    }

    #[track_caller]
    pub(crate) fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BridgeError::DeviceError {
                reason: format!("Failed to create recordings directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let device_error = |e: hound::Error| BridgeError::DeviceError {
            reason: format!("Failed to write {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(device_error)?;
        for &sample in samples {
            let s16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer.write_sample(s16).map_err(device_error)?;
        }
        writer.finalize().map_err(device_error)?;

        Ok(())
    }
}

impl CaptureDevice for WavRecorder {
    #[track_caller]
    #[instrument(skip(self, path), fields(path = ?path))]
    fn acquire(&mut self, session_id: Uuid, path: &Path) -> CoreResult<()> {
        let acquisition_failed = |reason: String| BridgeError::DeviceAcquisitionFailed {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if self.active.is_some() {
            return Err(acquisition_failed("device already held".to_string()));
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| acquisition_failed("no microphone found".to_string()))?;

        let supported = device
            .default_input_config()
            .map_err(|e| acquisition_failed(format!("Failed to get config: {}", e)))?;
        let channels = usize::from(supported.channels().max(1));
        let sample_rate = supported.sample_rate();
        let config: cpal::StreamConfig = supported.into();

        let max_samples = (self.max_duration.as_secs_f64() * f64::from(sample_rate)) as usize;
        let samples = Arc::new(Mutex::new(Vec::with_capacity(max_samples.min(1 << 20))));
        let flags = Arc::new(CaptureFlags::default());

        let data_samples = Arc::clone(&samples);
        let data_flags = Arc::clone(&flags);
        let data_events = self.events.clone();
        let error_flags = Arc::clone(&flags);
        let error_events = self.events.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if data_flags.shutdown.load(Ordering::Acquire)
                        || data_flags.paused.load(Ordering::Acquire)
                    {
                        return;
                    }

                    let mut buf = data_samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });

                    // Downmix interleaved frames to mono.
                    buf.extend(
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32),
                    );

                    if buf.len() >= max_samples {
                        buf.truncate(max_samples);
                        data_flags.shutdown.store(true, Ordering::Release);
                        if !data_flags.reported.swap(true, Ordering::AcqRel) {
                            let _ = data_events.send(DeviceEvent::Finished { session_id });
                        }
                    }
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                    if !error_flags.reported.swap(true, Ordering::AcqRel) {
                        let _ = error_events.send(DeviceEvent::Failed {
                            session_id,
                            reason: err.to_string(),
                        });
                    }
                },
                None,
            )
            .map_err(|e| acquisition_failed(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| acquisition_failed(format!("Failed to start stream: {}", e)))?;

        info!(
            session_id = %session_id,
            sample_rate,
            channels,
            "Audio capture started"
        );

        self.active = Some(ActiveCapture {
            session_id,
            path: path.to_path_buf(),
            stream,
            samples,
            flags,
            sample_rate,
        });

        Ok(())
    }

    #[track_caller]
    fn pause(&mut self) -> CoreResult<()> {
        let active = self.active.as_ref().ok_or_else(|| BridgeError::DeviceError {
            reason: "pause without an active capture".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        active.flags.paused.store(true, Ordering::Release);
        debug!(session_id = %active.session_id, "Audio capture paused");
        Ok(())
    }

    #[track_caller]
    fn resume(&mut self) -> CoreResult<()> {
        let active = self.active.as_ref().ok_or_else(|| BridgeError::DeviceError {
            reason: "resume without an active capture".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        active.flags.paused.store(false, Ordering::Release);
        debug!(session_id = %active.session_id, "Audio capture resumed");
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn finish(&mut self) -> CoreResult<PathBuf> {
        let active = self.active.take().ok_or_else(|| BridgeError::DeviceError {
            reason: "finish without an active capture".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        active.flags.shutdown.store(true, Ordering::Release);
        drop(active.stream);
        // Let an in-flight callback observe the shutdown flag.
        std::thread::sleep(Duration::from_millis(5));

        let samples = std::mem::take(
            &mut *active.samples.lock().unwrap_or_else(|e| e.into_inner()),
        );

        Self::write_wav(&active.path, &samples, active.sample_rate)?;

        info!(
            session_id = %active.session_id,
            path = ?active.path,
            sample_count = samples.len(),
            "Audio capture finished"
        );

        Ok(active.path)
    }

    fn release(&mut self) {
        if let Some(active) = self.active.take() {
            active.flags.shutdown.store(true, Ordering::Release);
            drop(active.stream);
            info!(session_id = %active.session_id, "Audio capture released");
        }
    }

    fn is_held(&self) -> bool {
        self.active.is_some()
    }
}
