//! Multi-step admin conversations: guided credit grants and broadcasts.
//!
//! One scene may be active per user at a time, keyed by the conversing
//! user's id in an engine-owned map. State is intentionally not persisted;
//! these are short admin interactions and losing them on restart is fine.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{BotError, BotResult};
use crate::ledger::CreditLedger;
use crate::messaging::Messenger;
use crate::store::accounts::AccountStore;

/// The step a user's conversation is currently waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scene {
    AwaitingTargetId,
    AwaitingAmount { target_id: i64 },
    AwaitingBroadcastMessage,
}

pub struct ConversationEngine {
    config: Config,
    ledger: CreditLedger,
    store: Arc<dyn AccountStore>,
    messenger: Arc<dyn Messenger>,
    active: RwLock<HashMap<i64, Scene>>,
}

impl ConversationEngine {
    pub fn new(
        config: Config,
        ledger: CreditLedger,
        store: Arc<dyn AccountStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            config,
            ledger,
            store,
            messenger,
            active: RwLock::new(HashMap::new()),
        }
    }

    pub async fn current_scene(&self, user_id: i64) -> Option<Scene> {
        self.active.read().await.get(&user_id).cloned()
    }

    /// Starts the guided credit-grant wizard. Entry attempts by non-admins
    /// are silently ignored: no state change, no reply.
    pub async fn enter_add_credit(&self, user_id: i64, chat_id: i64) -> BotResult<()> {
        if !self.config.is_admin(user_id) {
            return Ok(());
        }
        self.active
            .write()
            .await
            .insert(user_id, Scene::AwaitingTargetId);
        self.messenger
            .send(
                chat_id,
                "👤 Please send the User ID of the recipient.\n\nType /cancel to abort.",
            )
            .await?;
        Ok(())
    }

    /// Starts the broadcast wizard. Same admin-only, silent-ignore rule.
    pub async fn enter_broadcast(&self, user_id: i64, chat_id: i64) -> BotResult<()> {
        if !self.config.is_admin(user_id) {
            return Ok(());
        }
        self.active
            .write()
            .await
            .insert(user_id, Scene::AwaitingBroadcastMessage);
        self.messenger
            .send(
                chat_id,
                "📢 Please send the message you want to broadcast to all users.\n\nType /cancel to abort.",
            )
            .await?;
        Ok(())
    }

    /// Feeds `text` to the user's active scene, if any. Returns whether the
    /// text was consumed; `false` means no scene is active and the caller
    /// should dispatch the text normally.
    pub async fn handle_text(&self, user_id: i64, chat_id: i64, text: &str) -> BotResult<bool> {
        let Some(scene) = self.current_scene(user_id).await else {
            return Ok(false);
        };
        let input = text.trim();

        if input == "/cancel" {
            self.active.write().await.remove(&user_id);
            self.messenger
                .send_menu(chat_id, "🔹 Action has been cancelled.", true)
                .await?;
            return Ok(true);
        }

        match scene {
            Scene::AwaitingTargetId => {
                let Ok(target_id) = input.parse::<i64>() else {
                    self.messenger
                        .send(
                            chat_id,
                            "❗️Invalid ID. Please send numbers only or type /cancel.",
                        )
                        .await?;
                    return Ok(true);
                };
                if self.store.get(target_id).await?.is_none() {
                    self.messenger
                        .send(
                            chat_id,
                            "⚠️ User not found in the database. Please try again or type /cancel.",
                        )
                        .await?;
                    return Ok(true);
                }
                self.active
                    .write()
                    .await
                    .insert(user_id, Scene::AwaitingAmount { target_id });
                self.messenger
                    .send(
                        chat_id,
                        &format!(
                            "✅ User {target_id} found. Now, please send the amount of credits to add."
                        ),
                    )
                    .await?;
            }
            Scene::AwaitingAmount { target_id } => {
                match input.parse::<i64>() {
                    Ok(amount) if amount > 0 => {
                        self.active.write().await.remove(&user_id);
                        self.grant_and_confirm(chat_id, target_id, amount).await?;
                    }
                    _ => {
                        self.messenger
                            .send(
                                chat_id,
                                "❗️Invalid amount. Please send a positive number or type /cancel.",
                            )
                            .await?;
                    }
                }
            }
            Scene::AwaitingBroadcastMessage => {
                self.active.write().await.remove(&user_id);
                self.run_broadcast(chat_id, input).await?;
            }
        }
        Ok(true)
    }

    /// Applies a grant and reports the result to the admin; the recipient is
    /// notified best-effort. Shared by the guided wizard and the one-line
    /// `/addcredit` command.
    pub async fn grant_and_confirm(
        &self,
        admin_chat: i64,
        target_id: i64,
        amount: i64,
    ) -> BotResult<()> {
        match self.ledger.grant(target_id, amount).await {
            Ok(true) => {
                info!(target: "scenes", target_id, amount, "admin credit grant applied");
                self.messenger
                    .send_menu(
                        admin_chat,
                        &format!("✅ Success! Added {amount} credits to user {target_id}."),
                        true,
                    )
                    .await?;
                let note =
                    format!("🎉 An administrator has added {amount} credits to your account!");
                if let Err(err) = self.messenger.send(target_id, &note).await {
                    warn!(target: "scenes", target_id, error = %err, "failed to notify grant recipient");
                }
            }
            Ok(false) => {
                self.messenger
                    .send(admin_chat, "⚠️ User not found in the database.")
                    .await?;
            }
            Err(BotError::Validation(_)) => {
                self.messenger
                    .send(admin_chat, "❗️Invalid amount. Please send a positive number.")
                    .await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Delivers `payload` to every registered account, one at a time. A
    /// failure for one recipient never aborts the remainder; successes and
    /// failures are counted independently and reported at the end. The loop
    /// is sequential on purpose to keep failure isolation simple and avoid
    /// flooding the transport.
    async fn run_broadcast(&self, admin_chat: i64, payload: &str) -> BotResult<()> {
        let ids = self.store.all_ids().await?;
        self.messenger
            .send(
                admin_chat,
                &format!(
                    "⏳ Broadcasting your message to {} users... Please wait.",
                    ids.len()
                ),
            )
            .await?;

        let mut sent = 0u64;
        let mut failed = 0u64;
        for id in ids {
            match self.messenger.send(id, payload).await {
                Ok(_) => sent += 1,
                Err(err) => {
                    failed += 1;
                    warn!(target: "scenes", recipient = id, error = %err, "broadcast delivery failed");
                }
            }
        }
        info!(target: "scenes", sent, failed, "broadcast complete");
        self.messenger
            .send_menu(
                admin_chat,
                &format!(
                    "📢 Broadcast Complete!\n✅ Sent successfully: {sent}\n❌ Failed to send: {failed}"
                ),
                true,
            )
            .await?;
        Ok(())
    }
}
