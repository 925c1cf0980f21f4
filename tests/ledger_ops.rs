mod common;

use std::sync::Arc;

use common::profile;
use numvault_bot::constants::{REFERRAL_REWARD, STARTING_CREDITS};
use numvault_bot::error::BotError;
use numvault_bot::ledger::CreditLedger;
use numvault_bot::store::accounts::AccountStore;
use numvault_bot::store::memory::MemoryAccountStore;

fn setup() -> (CreditLedger, Arc<MemoryAccountStore>) {
    let store = Arc::new(MemoryAccountStore::new());
    (CreditLedger::new(store.clone()), store)
}

#[tokio::test]
async fn registration_is_idempotent() {
    let (ledger, store) = setup();

    let first = ledger
        .register_if_absent(profile(1, "Asha"), None)
        .await
        .unwrap();
    assert!(first.created);
    assert_eq!(first.account.credits, STARTING_CREDITS);
    assert_eq!(first.account.searches, 0);

    let second = ledger
        .register_if_absent(profile(1, "Asha"), None)
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.account.credits, STARTING_CREDITS);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn referral_credits_existing_referrer_exactly_once() {
    let (ledger, store) = setup();
    ledger
        .register_if_absent(profile(12345, "Referrer"), None)
        .await
        .unwrap();
    // Bring the referrer to balance 3 before the referral lands.
    ledger.grant(12345, 3 - STARTING_CREDITS).await.unwrap();

    let registration = ledger
        .register_if_absent(profile(2, "Invitee"), Some(12345))
        .await
        .unwrap();
    assert!(registration.created);
    assert_eq!(registration.account.credits, STARTING_CREDITS);
    let referral = registration.referral.expect("referral should be credited");
    assert_eq!(referral.referrer_id, 12345);
    assert_eq!(referral.new_balance, 3 + REFERRAL_REWARD);

    // Re-sending the same start payload after registration has no effect.
    let repeat = ledger
        .register_if_absent(profile(2, "Invitee"), Some(12345))
        .await
        .unwrap();
    assert!(!repeat.created);
    assert!(repeat.referral.is_none());
    let referrer = store.get(12345).await.unwrap().unwrap();
    assert_eq!(referrer.credits, 3 + REFERRAL_REWARD);
}

#[tokio::test]
async fn self_referral_never_changes_a_balance() {
    let (ledger, _store) = setup();
    let registration = ledger
        .register_if_absent(profile(5, "Loop"), Some(5))
        .await
        .unwrap();
    assert!(registration.created);
    assert!(registration.referral.is_none());
    assert_eq!(registration.account.credits, STARTING_CREDITS);
}

#[tokio::test]
async fn unknown_referrer_is_ignored() {
    let (ledger, store) = setup();
    let registration = ledger
        .register_if_absent(profile(6, "Newbie"), Some(999))
        .await
        .unwrap();
    assert!(registration.created);
    assert!(registration.referral.is_none());
    // The phantom referrer never came into existence as a side effect.
    assert!(store.get(999).await.unwrap().is_none());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn grant_rejects_non_positive_amounts() {
    let (ledger, _store) = setup();
    ledger
        .register_if_absent(profile(1, "Asha"), None)
        .await
        .unwrap();
    for amount in [0, -5] {
        let err = ledger.grant(1, amount).await.unwrap_err();
        assert!(matches!(err, BotError::Validation(_)));
    }
}

#[tokio::test]
async fn grant_on_missing_account_is_a_no_op() {
    let (ledger, store) = setup();
    assert!(!ledger.grant(404, 10).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn debit_then_refund_restores_both_counters() {
    let (ledger, store) = setup();
    ledger
        .register_if_absent(profile(1, "Asha"), None)
        .await
        .unwrap();

    assert!(ledger.debit(1, 1).await.unwrap());
    let mid = store.get(1).await.unwrap().unwrap();
    assert_eq!(mid.credits, STARTING_CREDITS - 1);
    assert_eq!(mid.searches, 1);

    assert!(ledger.refund(1, 1).await.unwrap());
    let after = store.get(1).await.unwrap().unwrap();
    assert_eq!(after.credits, STARTING_CREDITS);
    assert_eq!(after.searches, 0);
}

#[tokio::test]
async fn debit_never_commits_a_negative_balance() {
    let (ledger, store) = setup();
    ledger
        .register_if_absent(profile(1, "Asha"), None)
        .await
        .unwrap();
    assert!(ledger.debit(1, STARTING_CREDITS).await.unwrap());

    assert!(!ledger.debit(1, 1).await.unwrap());
    let account = store.get(1).await.unwrap().unwrap();
    assert_eq!(account.credits, 0);
    assert_eq!(account.searches, 1);
}
