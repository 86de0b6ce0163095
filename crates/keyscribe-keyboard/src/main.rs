//! KeyScribe keyboard extension: sends record/pause/stop intents to the host
//! through the shared container and inserts the text that comes back.

mod caret_inserter;
mod cli;
mod config;
mod controls;
mod display_state;
mod error;
mod key_input;
mod keyboard_session;
mod paste_modifier_guard;
#[cfg(test)]
mod tests;
mod text_inserter;

pub(crate) use {
    caret_inserter::CaretInserter,
    controls::Controls,
    display_state::{DisplaySnapshot, DisplayState},
    error::{KeyboardError, Result as KeyboardResult},
    key_input::{KeyInput, parse_key, start_parameters},
    keyboard_session::KeyboardSession,
    text_inserter::TextInserter,
};

use crate::{
    cli::{Cli, Command},
    config::Config,
};

use keyscribe_core::{
    ActionKind, ActionSender, ChangeNotifier, FileStore, StatusObserver, StoreKey, StoreWatcher,
};

use std::{collections::BTreeMap, io::BufRead, process::ExitCode};

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("keyscribe_keyboard=info,keyscribe_core=warn")),
        )
        .init();

    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "Keyboard error");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> KeyboardResult<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    let store_dir = match cli.store_dir {
        Some(dir) => dir,
        None => config.store.resolve_dir()?,
    };
    debug!(store_dir = ?store_dir, "Using shared container");

    // The container belongs to the host; the extension never creates it.
    let store = FileStore::attach(&store_dir);
    let notifier = ChangeNotifier::new();
    let display = DisplayState::new(config.display.grace_period());
    let controls = Controls::new(
        ActionSender::new(store.clone(), notifier.clone()),
        store.clone(),
        display.clone(),
    );

    match cli.command {
        Command::Start { prompt } => Ok(press(
            &controls,
            &display,
            ActionKind::StartRecording,
            start_parameters(prompt),
        )),
        Command::Pause => Ok(press(&controls, &display, ActionKind::PauseRecording, BTreeMap::new())),
        Command::Resume => Ok(press(&controls, &display, ActionKind::ResumeRecording, BTreeMap::new())),
        Command::Stop => Ok(press(&controls, &display, ActionKind::StopRecording, BTreeMap::new())),
        Command::Status => {
            let observer = StatusObserver::new(store);
            if let Ok(pending) = controls.press(ActionKind::CheckStatus, BTreeMap::new()) {
                let answered = tokio::time::timeout(config.channel.poll_interval() * 2, async {
                    loop {
                        match observer.current() {
                            Ok(status) if status.updated_at >= pending.issued_at => break,
                            _ => tokio::time::sleep(config.channel.watch_interval()).await,
                        }
                    }
                })
                .await
                .is_ok();
                if !answered {
                    debug!("Host did not answer, showing last published status");
                }
            }
            display.show_status(&observer.current()?);
            println!("{}", display.snapshot());
            Ok(ExitCode::SUCCESS)
        }
        Command::Capability => {
            let granted = controls.has_full_access();
            println!("Full access: {}", if granted { "granted" } else { "not granted" });
            Ok(if granted {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Watch => {
            let (key_tx, key_rx) = mpsc::channel(16);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);

            let watcher = StoreWatcher::new(
                store.clone(),
                vec![StoreKey::RecordingStatus, StoreKey::InsertionPayload],
                notifier.clone(),
            );
            let watcher_handle =
                tokio::spawn(watcher.run(config.channel.watch_interval(), shutdown_rx));

            // Plain thread: stdin blocks, and the process may exit while a
            // read is pending.
            std::thread::spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    match parse_key(&line) {
                        Some(key) => {
                            if key_tx.blocking_send(key).is_err() {
                                break;
                            }
                        }
                        None if line.trim().is_empty() => {}
                        None => eprintln!(
                            "Keys: start [prompt], pause, resume, stop, status, quit"
                        ),
                    }
                }
            });

            let session = KeyboardSession {
                controls,
                observer: StatusObserver::new(store),
                inserter: CaretInserter::new(config.insertion.auto_paste)?,
                display,
                notifications: notifier.subscribe(),
                poll_interval: config.channel.poll_interval(),
                last_printed: None,
            };
            let result = session.run(key_rx).await;

            let _ = shutdown_tx.send(true);
            if let Err(e) = watcher_handle.await {
                error!(error = ?e, "Store watcher task panicked");
            }

            result.map(|()| ExitCode::SUCCESS)
        }
    }
}

/// Send one action and print the outcome.
fn press(
    controls: &Controls<FileStore>,
    display: &DisplayState,
    action: ActionKind,
    parameters: BTreeMap<String, String>,
) -> ExitCode {
    match controls.press(action, parameters) {
        Ok(pending) => {
            println!("Sent {}", pending.action);
            ExitCode::SUCCESS
        }
        Err(_) => {
            println!("{}", display.snapshot());
            ExitCode::FAILURE
        }
    }
}
