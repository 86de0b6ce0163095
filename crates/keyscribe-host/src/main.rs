//! KeyScribe host: records the microphone on behalf of the keyboard
//! extension and hands the cleaned-up transcription back.

mod app;
mod app_command;
mod config;
mod duration_ticker;
mod error;
mod lifecycle;
#[cfg(test)]
mod tests;
mod transcription;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    duration_ticker::DurationTicker,
    error::{AppError, Result as AppResult},
    transcription::HttpTranscriptionClient,
};

use crate::config::Config;

use keyscribe_core::{
    ActionReceiver, ChangeNotifier, FileStore, HostMicrophonePermission, RecordingService,
    StatusPublisher, StoreKey, StoreWatcher, WavRecorder,
};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("keyscribe_host=debug,keyscribe_core=debug")),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(config)) {
        error!(error = ?e, "Host error");
        std::process::exit(1);
    }
}

/// Wire the store, devices and background tasks together and run the loop.
async fn run(config: Config) -> AppResult<()> {
    let store = FileStore::open(&config.store.dir)?;
    tokio::fs::create_dir_all(&config.recording.dir).await?;

    let notifier = ChangeNotifier::new();
    let (device_tx, device_rx) = mpsc::unbounded_channel();
    let service = RecordingService::new(
        StatusPublisher::new(store.clone(), notifier.clone()),
        WavRecorder::new(config.recording.max_duration(), device_tx),
        HostMicrophonePermission::new(),
        config.recording.dir.clone(),
    );
    let transcriber = Arc::new(HttpTranscriptionClient::new(&config.transcription)?);

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Raises a wake-up when the extension writes an action; the loop's own
    // poll still covers anything the watcher misses.
    let watcher = StoreWatcher::new(store.clone(), vec![StoreKey::PendingAction], notifier.clone());
    let watcher_handle = tokio::spawn(watcher.run(config.channel.watch_interval(), shutdown_rx.clone()));

    let signal_tx = command_tx.clone();
    let signal_handle = tokio::spawn(async move {
        if let Err(e) = lifecycle::forward_signals(signal_tx, shutdown_rx).await {
            error!(error = ?e, "Signal forwarder error");
        }
    });

    let app = App {
        service,
        receiver: ActionReceiver::new(store),
        transcriber,
        notifications: notifier.subscribe(),
        config,
        command_tx,
        command_rx,
        device_rx,
        shutdown_tx,
    };

    let result = app.run().await;

    let (watcher_result, signal_result) = tokio::join!(watcher_handle, signal_handle);
    if let Err(e) = watcher_result {
        error!(error = ?e, "Store watcher task panicked");
    }
    if let Err(e) = signal_result {
        error!(error = ?e, "Signal forwarder task panicked");
    }

    info!("Background tasks stopped");
    result
}
