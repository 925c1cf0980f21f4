//! Telegram transport wiring: the dispatcher plus the adapter submodules.

pub mod handlers;
pub mod messenger;
pub mod ui;

use std::sync::Arc;

use teloxide::dptree;
use teloxide::prelude::*;
use tracing::error;

use crate::ledger::UserProfile;
use crate::model::AppState;

/// Builds and runs the long-polling dispatcher until shutdown.
pub async fn run(bot: Bot, state: Arc<AppState>) {
    let handler = Update::filter_message().endpoint(on_message);
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if from.is_bot {
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let profile = UserProfile {
        user_id: from.id.0 as i64,
        first_name: from.first_name.clone(),
        username: from.username.clone(),
    };
    let chat_id = msg.chat.id.0;
    if let Err(err) = handlers::handle_update(state, profile, chat_id, text).await {
        // Operator-facing only; user-visible replies were produced (or
        // attempted) before any error got this far.
        error!(target: "bot", user_id = from.id.0, error = %err, "update handling failed");
    }
    Ok(())
}
