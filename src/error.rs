//! Unified error taxonomy. Externally-facing operations convert lower-level
//! failures into one of these kinds before producing a user message; internal
//! detail (collaborator error text, backtraces) stays in the operator logs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("membership check denied")]
    AuthorizationDenied,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("account {0} not found")]
    AccountNotFound(i64),

    #[error("insufficient credits")]
    InsufficientBalance,

    #[error("lookup service failure: {0}")]
    ExternalService(String),

    #[error("delivery to chat {chat_id} failed: {reason}")]
    Delivery { chat_id: i64, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type BotResult<T> = Result<T, BotError>;
