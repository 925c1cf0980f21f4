//! Atomic credit operations over the account store.
//!
//! Every mutation here is a single store-level increment; nothing in this
//! module reads a balance and writes it back, so concurrent updates for the
//! same account cannot lose each other.

use std::sync::Arc;

use crate::constants::{REFERRAL_REWARD, STARTING_CREDITS};
use crate::error::{BotError, BotResult};
use crate::store::accounts::{Account, AccountStore, NewAccount};

/// Profile details captured from the chat transport.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user_id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Outcome of [`CreditLedger::register_if_absent`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub account: Account,
    /// Whether this invocation created the account.
    pub created: bool,
    /// Present when a referral reward was applied while creating the account.
    /// The caller is expected to notify the referrer best-effort.
    pub referral: Option<ReferralCredit>,
}

#[derive(Debug, Clone)]
pub struct ReferralCredit {
    pub referrer_id: i64,
    pub reward: i64,
    pub new_balance: i64,
}

#[derive(Clone)]
pub struct CreditLedger {
    store: Arc<dyn AccountStore>,
}

impl CreditLedger {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Creates the account on first contact with the starting balance; later
    /// invocations return the stored row untouched. The referral reward is
    /// applied only on the invocation that actually inserted the row, so a
    /// referrer is credited at most once per referred user, and only when
    /// the referrer is a distinct, already-registered account.
    pub async fn register_if_absent(
        &self,
        profile: UserProfile,
        referrer_id: Option<i64>,
    ) -> BotResult<Registration> {
        let user_id = profile.user_id;
        let created = self
            .store
            .create_if_absent(NewAccount {
                user_id,
                first_name: profile.first_name,
                username: profile.username,
                credits: STARTING_CREDITS,
            })
            .await?;

        let mut referral = None;
        if created {
            if let Some(referrer_id) = referrer_id.filter(|id| *id != user_id) {
                if self.store.adjust(referrer_id, REFERRAL_REWARD, 0).await? {
                    let new_balance = self
                        .store
                        .get(referrer_id)
                        .await?
                        .map_or(REFERRAL_REWARD, |account| account.credits);
                    referral = Some(ReferralCredit {
                        referrer_id,
                        reward: REFERRAL_REWARD,
                        new_balance,
                    });
                }
            }
        }

        let account = self
            .store
            .get(user_id)
            .await?
            .ok_or(BotError::AccountNotFound(user_id))?;
        Ok(Registration {
            account,
            created,
            referral,
        })
    }

    /// Admin credit top-up. Amounts must be positive integers; the target
    /// account is never created as a side effect. Returns whether a target
    /// row existed.
    pub async fn grant(&self, target_id: i64, amount: i64) -> BotResult<bool> {
        if amount <= 0 {
            return Err(BotError::Validation(format!(
                "grant amount must be positive, got {amount}"
            )));
        }
        Ok(self.store.adjust(target_id, amount, 0).await?)
    }

    /// Takes `amount` credits and counts one more search in a single atomic
    /// step. Returns `false` when the account is missing or the balance
    /// cannot cover the debit; nothing is charged in that case.
    pub async fn debit(&self, user_id: i64, amount: i64) -> BotResult<bool> {
        if amount <= 0 {
            return Err(BotError::Validation(format!(
                "debit amount must be positive, got {amount}"
            )));
        }
        Ok(self.store.adjust(user_id, -amount, 1).await?)
    }

    /// Exact inverse of [`CreditLedger::debit`], used to reverse the charge
    /// of a failed lookup.
    pub async fn refund(&self, user_id: i64, amount: i64) -> BotResult<bool> {
        if amount <= 0 {
            return Err(BotError::Validation(format!(
                "refund amount must be positive, got {amount}"
            )));
        }
        Ok(self.store.adjust(user_id, amount, -1).await?)
    }
}
