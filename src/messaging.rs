//! Outbound messaging contract. The core drives every user-visible message
//! through this trait so workflows stay testable without a live transport.

use async_trait::async_trait;

use crate::error::BotResult;

/// Address of a sent message, kept for later edits or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends `text` to `chat_id`, returning a handle for edit/delete.
    async fn send(&self, chat_id: i64, text: &str) -> BotResult<MessageRef>;

    /// Sends `text` with the main-menu keyboard attached; `admin` selects
    /// the variant with the admin rows appended.
    async fn send_menu(&self, chat_id: i64, text: &str, admin: bool) -> BotResult<MessageRef>;

    /// Rewrites a previously sent message in place.
    async fn edit(&self, message: MessageRef, text: &str) -> BotResult<()>;

    /// Removes a previously sent message.
    async fn delete(&self, message: MessageRef) -> BotResult<()>;
}
