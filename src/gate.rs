//! Channel-membership gate, evaluated before any other handling.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;
use crate::error::{BotError, BotResult};
use crate::messaging::Messenger;

/// A user's status within the required channel, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Member,
    Administrator,
    Creator,
    Other,
}

impl MembershipStatus {
    pub fn authorizes(self) -> bool {
        matches!(self, Self::Member | Self::Administrator | Self::Creator)
    }
}

/// Transport-side membership query.
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    async fn member_status(&self, channel: &str, user_id: i64) -> BotResult<MembershipStatus>;
}

pub struct MembershipGate {
    config: Config,
    provider: Arc<dyn MembershipProvider>,
    messenger: Arc<dyn Messenger>,
}

impl MembershipGate {
    pub fn new(
        config: Config,
        provider: Arc<dyn MembershipProvider>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            config,
            provider,
            messenger,
        }
    }

    /// Admins always pass without touching the provider. Everyone else must
    /// hold an authorizing status in the configured channel; any provider
    /// failure denies (never fail-open). Denial sends exactly one
    /// explanatory message and mutates no state.
    pub async fn authorize(&self, user_id: i64, chat_id: i64) -> BotResult<()> {
        if self.config.is_admin(user_id) {
            return Ok(());
        }
        match self
            .provider
            .member_status(&self.config.channel, user_id)
            .await
        {
            Ok(status) if status.authorizes() => Ok(()),
            Ok(_) => {
                let text = format!(
                    "❗️ Access Denied\n\nTo use this bot, you must join our official channel.\nPlease join 👉 {} and then press /start.",
                    self.config.channel
                );
                if let Err(err) = self.messenger.send(chat_id, &text).await {
                    warn!(target: "gate", user_id, error = %err, "failed to deliver denial notice");
                }
                Err(BotError::AuthorizationDenied)
            }
            Err(err) => {
                warn!(target: "gate", user_id, error = %err, "membership check failed; denying");
                let text = "⛔️ Error verifying channel membership. Please contact support.";
                if let Err(err) = self.messenger.send(chat_id, text).await {
                    warn!(target: "gate", user_id, error = %err, "failed to deliver denial notice");
                }
                Err(BotError::AuthorizationDenied)
            }
        }
    }
}
