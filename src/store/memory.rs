//! In-memory account storage with the same guard semantics as the Postgres
//! backend. Used by the test suite and for database-free smoke runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::accounts::{Account, AccountStore, NewAccount};
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryAccountStore {
    rows: Mutex<BTreeMap<i64, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_if_absent(&self, account: NewAccount) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&account.user_id) {
            return Ok(false);
        }
        rows.insert(
            account.user_id,
            Account {
                user_id: account.user_id,
                first_name: account.first_name,
                username: account.username,
                credits: account.credits,
                searches: 0,
                joined_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn get(&self, user_id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.rows.lock().await.get(&user_id).cloned())
    }

    async fn adjust(
        &self,
        user_id: i64,
        credit_delta: i64,
        search_delta: i64,
    ) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().await;
        let Some(account) = rows.get_mut(&user_id) else {
            return Ok(false);
        };
        let credits = account.credits + credit_delta;
        let searches = account.searches + search_delta;
        if credits < 0 || searches < 0 {
            return Ok(false);
        }
        account.credits = credits;
        account.searches = searches;
        Ok(true)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.rows.lock().await.len() as i64)
    }

    async fn all_ids(&self) -> Result<Vec<i64>, StoreError> {
        Ok(self.rows.lock().await.keys().copied().collect())
    }
}
