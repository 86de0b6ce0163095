use crate::{KeyboardError, KeyboardResult};

use std::{fmt::Display, panic::Location, thread, time::Duration};

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use error_location::ErrorLocation;

#[cfg(target_os = "macos")]
const PASTE_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const PASTE_MODIFIER: Key = Key::Control;

const PASTE_KEY: char = 'v';

/// Type the platform paste chord, pausing `gap` between key events.
///
/// Blocking; run it off the async runtime.
#[track_caller]
pub(crate) fn simulate_paste(gap: Duration) -> KeyboardResult<()> {
    let mut guard = PasteModifierGuard::press()?;
    thread::sleep(gap);
    guard.click(PASTE_KEY)?;
    thread::sleep(gap);
    guard.release()
}

/// Paste modifier held down by this process.
///
/// [`PasteModifierGuard::release`] reports a failed release. If the guard is
/// dropped without it (an earlier key event failed), `Drop` still lets go of
/// the modifier and ignores the outcome.
pub struct PasteModifierGuard {
    enigo: Enigo,
    held: bool,
}

impl PasteModifierGuard {
    #[track_caller]
    pub(crate) fn press() -> KeyboardResult<Self> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| auto_paste_failed("open input", e))?;

        enigo
            .key(PASTE_MODIFIER, Direction::Press)
            .map_err(|e| auto_paste_failed("press paste modifier", e))?;

        Ok(Self { enigo, held: true })
    }

    #[track_caller]
    pub(crate) fn click(&mut self, key: char) -> KeyboardResult<()> {
        self.enigo
            .key(Key::Unicode(key), Direction::Click)
            .map_err(|e| auto_paste_failed(&format!("type {:?}", key), e))
    }

    #[track_caller]
    pub(crate) fn release(mut self) -> KeyboardResult<()> {
        self.held = false;
        self.enigo
            .key(PASTE_MODIFIER, Direction::Release)
            .map_err(|e| auto_paste_failed("release paste modifier", e))
    }
}

impl Drop for PasteModifierGuard {
    fn drop(&mut self) {
        if self.held {
            let _ = self.enigo.key(PASTE_MODIFIER, Direction::Release);
        }
    }
}

#[track_caller]
pub(crate) fn auto_paste_failed(step: &str, err: impl Display) -> KeyboardError {
    KeyboardError::AutoPasteFailed {
        reason: format!("Failed to {}: {}", step, err),
        location: ErrorLocation::from(Location::caller()),
    }
}
