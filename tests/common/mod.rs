//! Shared test doubles: a recording messenger plus scripted lookup and
//! membership collaborators.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use numvault_bot::config::Config;
use numvault_bot::error::{BotError, BotResult};
use numvault_bot::gate::{MembershipProvider, MembershipStatus};
use numvault_bot::ledger::UserProfile;
use numvault_bot::lookup::{LookupApi, LookupRecord};
use numvault_bot::messaging::{MessageRef, Messenger};

pub fn test_config(admin_ids: Vec<i64>) -> Config {
    Config {
        admin_ids,
        channel: "@testchannel".to_string(),
        support_handle: "@support".to_string(),
        lookup_api_url: "http://localhost/api/num".to_string(),
    }
}

pub fn profile(user_id: i64, name: &str) -> UserProfile {
    UserProfile {
        user_id,
        first_name: name.to_string(),
        username: None,
    }
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub menu: bool,
}

/// Records every outbound operation; individual chats can be marked as
/// failing to exercise per-recipient error isolation.
#[derive(Default)]
pub struct RecordingMessenger {
    next_id: AtomicI32,
    pub sent: Mutex<Vec<SentMessage>>,
    pub edits: Mutex<Vec<(MessageRef, String)>>,
    pub deleted: Mutex<Vec<MessageRef>>,
    failing_chats: Mutex<HashSet<i64>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().unwrap().insert(chat_id);
    }

    pub fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.chat_id == chat_id)
            .map(|message| message.text.clone())
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn record(&self, chat_id: i64, text: &str, menu: bool) -> BotResult<MessageRef> {
        if self.failing_chats.lock().unwrap().contains(&chat_id) {
            return Err(BotError::Delivery {
                chat_id,
                reason: "blocked by recipient".to_string(),
            });
        }
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            menu,
        });
        Ok(MessageRef {
            chat_id,
            message_id,
        })
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, chat_id: i64, text: &str) -> BotResult<MessageRef> {
        self.record(chat_id, text, false)
    }

    async fn send_menu(&self, chat_id: i64, text: &str, _admin: bool) -> BotResult<MessageRef> {
        self.record(chat_id, text, true)
    }

    async fn edit(&self, message: MessageRef, text: &str) -> BotResult<()> {
        if self.failing_chats.lock().unwrap().contains(&message.chat_id) {
            return Err(BotError::Delivery {
                chat_id: message.chat_id,
                reason: "blocked by recipient".to_string(),
            });
        }
        self.edits.lock().unwrap().push((message, text.to_string()));
        Ok(())
    }

    async fn delete(&self, message: MessageRef) -> BotResult<()> {
        self.deleted.lock().unwrap().push(message);
        Ok(())
    }
}

pub enum LookupScript {
    Records(Vec<LookupRecord>),
    Empty,
    Fail,
    /// Never resolves; exercises the orchestrator's time budget.
    Hang,
}

pub struct ScriptedLookupApi {
    script: LookupScript,
}

impl ScriptedLookupApi {
    pub fn new(script: LookupScript) -> Self {
        Self { script }
    }
}

#[async_trait]
impl LookupApi for ScriptedLookupApi {
    async fn lookup(&self, _query: &str) -> BotResult<Vec<LookupRecord>> {
        match &self.script {
            LookupScript::Records(records) => Ok(records.clone()),
            LookupScript::Empty => Ok(Vec::new()),
            LookupScript::Fail => Err(BotError::ExternalService("connection reset".to_string())),
            LookupScript::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

pub fn record(name: &str, mobile: &str, address: &str) -> LookupRecord {
    LookupRecord {
        name: Some(name.to_string()),
        fname: None,
        mobile: Some(mobile.to_string()),
        address: Some(address.to_string()),
        circle: None,
    }
}

pub enum MembershipScript {
    Status(MembershipStatus),
    Fail,
}

pub struct ScriptedMembership {
    script: MembershipScript,
}

impl ScriptedMembership {
    pub fn new(script: MembershipScript) -> Self {
        Self { script }
    }
}

#[async_trait]
impl MembershipProvider for ScriptedMembership {
    async fn member_status(&self, _channel: &str, _user_id: i64) -> BotResult<MembershipStatus> {
        match &self.script {
            MembershipScript::Status(status) => Ok(*status),
            MembershipScript::Fail => {
                Err(BotError::ExternalService("member query failed".to_string()))
            }
        }
    }
}
