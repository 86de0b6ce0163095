//! Command-line surface of the keyboard extension.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// KeyScribe keyboard: dictate into any text field through the host app.
#[derive(Parser, Debug)]
#[command(name = "keyscribe-keyboard", version, about)]
pub struct Cli {
    /// Path to keyboard.toml.
    #[arg(short = 'c', long = "config", env = "KEYSCRIBE_KEYBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Shared container directory, overriding the configuration.
    #[arg(long = "store-dir", env = "KEYSCRIBE_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Keyboard actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a recording session.
    Start {
        /// Cleanup prompt for this session.
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Pause the current recording.
    Pause,
    /// Resume a paused recording.
    Resume,
    /// Stop recording and transcribe.
    Stop,
    /// Ask the host for its status and print it.
    Status,
    /// Report whether the shared container is reachable.
    Capability,
    /// Stay loaded: show status, insert text, read control keys from stdin.
    Watch,
}
