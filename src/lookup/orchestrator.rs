//! The single paid-lookup workflow: debit, query, present, refund on
//! failure, and always close with the remaining balance.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::{format_record, is_valid_query, LookupApi, LookupRecord};
use crate::constants::{LOOKUP_COST, LOOKUP_TIMEOUT_SECS};
use crate::error::{BotError, BotResult};
use crate::ledger::CreditLedger;
use crate::messaging::Messenger;
use crate::store::accounts::AccountStore;

pub struct LookupOrchestrator {
    ledger: CreditLedger,
    store: Arc<dyn AccountStore>,
    api: Arc<dyn LookupApi>,
    messenger: Arc<dyn Messenger>,
}

impl LookupOrchestrator {
    pub fn new(
        ledger: CreditLedger,
        store: Arc<dyn AccountStore>,
        api: Arc<dyn LookupApi>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            ledger,
            store,
            api,
            messenger,
        }
    }

    /// Runs one paid lookup for `query`. A failed lookup is refunded in the
    /// exact amount that was debited; `Ok(())` is returned even then, since
    /// the failure was already reported to the user. Only store faults on
    /// the orchestration path itself surface as errors.
    pub async fn run(&self, user_id: i64, chat_id: i64, query: &str) -> BotResult<()> {
        let query = query.trim();
        if !is_valid_query(query) {
            self.messenger
                .send(chat_id, "Please send a valid number or use the menu buttons.")
                .await?;
            return Ok(());
        }

        let Some(account) = self.store.get(user_id).await? else {
            self.messenger
                .send(chat_id, "Please press /start to register.")
                .await?;
            return Ok(());
        };
        if account.credits < LOOKUP_COST {
            self.messenger
                .send(chat_id, "You have insufficient credits.")
                .await?;
            return Ok(());
        }

        let notice = self
            .messenger
            .send(chat_id, "🔎 Accessing database... This will consume 1 credit.")
            .await?;
        if !self.ledger.debit(user_id, LOOKUP_COST).await? {
            // Lost a race with a concurrent debit; nothing was charged.
            if let Err(err) = self
                .messenger
                .edit(notice, "You have insufficient credits.")
                .await
            {
                warn!(target: "lookup", user_id, error = %err, "failed to rewrite notice");
            }
            return Ok(());
        }

        match self.fetch(query).await {
            Ok(records) => {
                if let Err(err) = self.messenger.delete(notice).await {
                    warn!(target: "lookup", user_id, error = %err, "failed to remove notice");
                }
                self.present(chat_id, query, &records).await;
            }
            Err(err) => {
                warn!(target: "lookup", user_id, error = %err, "lookup failed; refunding");
                if let Err(err) = self
                    .messenger
                    .edit(
                        notice,
                        "❌ No Data Found.\nPlease check the number and try again.",
                    )
                    .await
                {
                    warn!(target: "lookup", user_id, error = %err, "failed to rewrite notice");
                }
                if !self.ledger.refund(user_id, LOOKUP_COST).await? {
                    warn!(target: "lookup", user_id, "refund matched no account");
                }
            }
        }

        // The closing balance is reported on both paths. It may already
        // reflect other concurrent activity; it is a display value only.
        if let Some(account) = self.store.get(user_id).await? {
            self.messenger
                .send(chat_id, &format!("💳 Credits remaining: {}", account.credits))
                .await?;
        }
        Ok(())
    }

    /// Queries the API under the time budget and folds "no records" into the
    /// failure path; callers cannot tell an empty list from a transport
    /// error, and are not supposed to.
    async fn fetch(&self, query: &str) -> BotResult<Vec<LookupRecord>> {
        let records = tokio::time::timeout(
            Duration::from_secs(LOOKUP_TIMEOUT_SECS),
            self.api.lookup(query),
        )
        .await
        .map_err(|_| BotError::ExternalService("lookup timed out".to_string()))??;
        if records.is_empty() {
            return Err(BotError::ExternalService("no data found".to_string()));
        }
        Ok(records)
    }

    /// Sends the summary line and one message per record. Delivery failures
    /// here are logged and skipped so the closing balance still goes out.
    async fn present(&self, chat_id: i64, query: &str, records: &[LookupRecord]) {
        let summary = format!(
            "✅ Database Report Generated!\nFound {} record(s) for {}. Details below:",
            records.len(),
            query
        );
        if let Err(err) = self.messenger.send(chat_id, &summary).await {
            warn!(target: "lookup", chat_id, error = %err, "failed to deliver summary");
        }
        for (index, record) in records.iter().enumerate() {
            let body = format_record(record, index, records.len());
            if let Err(err) = self.messenger.send(chat_id, &body).await {
                warn!(target: "lookup", chat_id, error = %err, "failed to deliver record");
            }
        }
    }
}
