use serde::{Deserialize, Serialize};

/// Text insertion behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertionConfig {
    /// Simulate the paste keystroke after copying. When off, text is left on
    /// the clipboard.
    pub auto_paste: bool,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self { auto_paste: true }
    }
}
