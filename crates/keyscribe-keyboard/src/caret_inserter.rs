//! Inserts transcribed text at the caret of the focused application.
//!
//! The text goes through the clipboard and an optional simulated paste
//! keystroke, since the extension has no direct access to the document.

use crate::{
    KeyboardError, KeyboardResult, TextInserter,
    paste_modifier_guard::{auto_paste_failed, simulate_paste},
};

use std::{panic::Location, time::Duration};

use arboard::Clipboard;
use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Time for the clipboard owner to publish the new contents before pasting.
const CLIPBOARD_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Gap between key events of the paste chord.
const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// Clipboard-and-paste [`TextInserter`].
pub struct CaretInserter {
    clipboard: Clipboard,
    auto_paste: bool,
}

impl CaretInserter {
    /// Open the clipboard.
    #[track_caller]
    #[instrument]
    pub fn new(auto_paste: bool) -> KeyboardResult<Self> {
        let clipboard = Clipboard::new().map_err(|e| KeyboardError::ClipboardError {
            reason: format!("Failed to initialize clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(auto_paste, "Caret inserter ready");

        Ok(Self {
            clipboard,
            auto_paste,
        })
    }

    #[instrument(skip(self))]
    async fn paste(&mut self) -> KeyboardResult<()> {
        // Enigo is not Send, so the chord is typed on a blocking thread.
        tokio::task::spawn_blocking(|| simulate_paste(KEY_EVENT_DELAY))
            .await
            .map_err(|e| auto_paste_failed("join paste task", e))??;

        debug!("Paste simulated");
        Ok(())
    }
}

#[async_trait]
impl TextInserter for CaretInserter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn insert(&mut self, text: &str) -> KeyboardResult<()> {
        self.clipboard
            .set_text(text)
            .map_err(|e| KeyboardError::ClipboardError {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if self.auto_paste {
            tokio::time::sleep(CLIPBOARD_SETTLE_DELAY).await;

            if let Err(e) = self.paste().await {
                warn!(error = ?e, "Auto-paste failed, text left on clipboard");
                return Err(e);
            }
        }

        info!(auto_pasted = self.auto_paste, "Text inserted");
        Ok(())
    }
}
