mod channel_config;
#[allow(clippy::module_inception)]
mod config;
mod display_config;
mod insertion_config;
mod store_config;

pub(crate) use {
    channel_config::ChannelConfig, config::Config, display_config::DisplayConfig,
    insertion_config::InsertionConfig, store_config::StoreConfig,
};

pub(crate) const DEFAULT_GRACE_PERIOD_MS: u64 = 1500;
pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub(crate) const DEFAULT_WATCH_INTERVAL_MS: u64 = 100;
