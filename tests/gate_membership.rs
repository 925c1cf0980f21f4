mod common;

use std::sync::Arc;

use common::{test_config, MembershipScript, RecordingMessenger, ScriptedMembership};
use numvault_bot::gate::{MembershipGate, MembershipStatus};

const ADMIN: i64 = 1;
const VISITOR: i64 = 9;

fn gate(script: MembershipScript) -> (MembershipGate, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::new());
    let gate = MembershipGate::new(
        test_config(vec![ADMIN]),
        Arc::new(ScriptedMembership::new(script)),
        messenger.clone(),
    );
    (gate, messenger)
}

#[tokio::test]
async fn admins_bypass_the_membership_check_entirely() {
    let (gate, messenger) = gate(MembershipScript::Fail);
    assert!(gate.authorize(ADMIN, ADMIN).await.is_ok());
    assert_eq!(messenger.sent_count(), 0);
}

#[tokio::test]
async fn channel_members_of_any_rank_are_authorized() {
    for status in [
        MembershipStatus::Member,
        MembershipStatus::Administrator,
        MembershipStatus::Creator,
    ] {
        let (gate, messenger) = gate(MembershipScript::Status(status));
        assert!(gate.authorize(VISITOR, VISITOR).await.is_ok());
        assert_eq!(messenger.sent_count(), 0);
    }
}

#[tokio::test]
async fn outsiders_are_denied_with_a_single_join_prompt() {
    let (gate, messenger) = gate(MembershipScript::Status(MembershipStatus::Other));
    assert!(gate.authorize(VISITOR, VISITOR).await.is_err());

    let texts = messenger.texts_for(VISITOR);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("@testchannel"));
}

#[tokio::test]
async fn provider_failures_deny_rather_than_fail_open() {
    let (gate, messenger) = gate(MembershipScript::Fail);
    assert!(gate.authorize(VISITOR, VISITOR).await.is_err());

    let texts = messenger.texts_for(VISITOR);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("support"));
}
