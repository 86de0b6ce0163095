use crate::KeyboardResult;

use async_trait::async_trait;

/// Puts text into the focused document at the caret.
#[async_trait]
pub trait TextInserter: Send {
    /// Insert `text` at the caret.
    async fn insert(&mut self, text: &str) -> KeyboardResult<()>;
}
