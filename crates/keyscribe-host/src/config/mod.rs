mod channel_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_config;
mod store_config;
mod transcription_config;

pub(crate) use {
    channel_config::ChannelConfig, config::Config, recording_config::RecordingConfig,
    store_config::StoreConfig, transcription_config::TranscriptionConfig,
};

pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub(crate) const DEFAULT_WATCH_INTERVAL_MS: u64 = 100;
pub(crate) const DEFAULT_DURATION_TICK_MS: u64 = 100;
pub(crate) const DEFAULT_MAX_DURATION_SECS: u64 = 300;
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub(crate) const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1/transcriptions";

pub(crate) fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

pub(crate) fn default_watch_interval_ms() -> u64 {
    DEFAULT_WATCH_INTERVAL_MS
}

pub(crate) fn default_duration_tick_ms() -> u64 {
    DEFAULT_DURATION_TICK_MS
}

pub(crate) fn default_max_duration_secs() -> u64 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
