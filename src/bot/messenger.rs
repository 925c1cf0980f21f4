//! Telegram-backed implementations of the core's transport contracts.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, MessageId, Recipient, UserId};

use crate::bot::ui;
use crate::error::{BotError, BotResult};
use crate::gate::{MembershipProvider, MembershipStatus};
use crate::messaging::{MessageRef, Messenger};

pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn delivery_error(chat_id: i64, err: teloxide::RequestError) -> BotError {
        BotError::Delivery {
            chat_id,
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, chat_id: i64, text: &str) -> BotResult<MessageRef> {
        let message = self
            .bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|err| Self::delivery_error(chat_id, err))?;
        Ok(MessageRef {
            chat_id,
            message_id: message.id.0,
        })
    }

    async fn send_menu(&self, chat_id: i64, text: &str, admin: bool) -> BotResult<MessageRef> {
        let message = self
            .bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(ui::main_menu(admin))
            .await
            .map_err(|err| Self::delivery_error(chat_id, err))?;
        Ok(MessageRef {
            chat_id,
            message_id: message.id.0,
        })
    }

    async fn edit(&self, message: MessageRef, text: &str) -> BotResult<()> {
        self.bot
            .edit_message_text(ChatId(message.chat_id), MessageId(message.message_id), text)
            .await
            .map_err(|err| Self::delivery_error(message.chat_id, err))?;
        Ok(())
    }

    async fn delete(&self, message: MessageRef) -> BotResult<()> {
        self.bot
            .delete_message(ChatId(message.chat_id), MessageId(message.message_id))
            .await
            .map_err(|err| Self::delivery_error(message.chat_id, err))?;
        Ok(())
    }
}

pub struct TelegramMembership {
    bot: Bot,
}

impl TelegramMembership {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MembershipProvider for TelegramMembership {
    async fn member_status(&self, channel: &str, user_id: i64) -> BotResult<MembershipStatus> {
        let member = self
            .bot
            .get_chat_member(
                Recipient::ChannelUsername(channel.to_owned()),
                UserId(user_id as u64),
            )
            .await
            .map_err(|err| BotError::ExternalService(err.to_string()))?;
        Ok(match member.status() {
            ChatMemberStatus::Member => MembershipStatus::Member,
            ChatMemberStatus::Administrator => MembershipStatus::Administrator,
            ChatMemberStatus::Owner => MembershipStatus::Creator,
            _ => MembershipStatus::Other,
        })
    }
}
