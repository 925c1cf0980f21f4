//! Postgres-backed account storage.

use async_trait::async_trait;
use sqlx::PgPool;

use super::accounts::{Account, AccountStore, NewAccount};
use crate::error::StoreError;

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_if_absent(&self, account: NewAccount) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO accounts (user_id, first_name, username, credits, searches) \
             VALUES ($1, $2, $3, $4, 0) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(account.user_id)
        .bind(&account.first_name)
        .bind(&account.username)
        .bind(account.credits)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get(&self, user_id: i64) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, Account>(
            "SELECT user_id, first_name, username, credits, searches, joined_at \
             FROM accounts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn adjust(
        &self,
        user_id: i64,
        credit_delta: i64,
        search_delta: i64,
    ) -> Result<bool, StoreError> {
        // Single-statement increment; the guards keep committed counters
        // non-negative under concurrent debits.
        let result = sqlx::query(
            "UPDATE accounts SET credits = credits + $2, searches = searches + $3 \
             WHERE user_id = $1 AND credits + $2 >= 0 AND searches + $3 >= 0",
        )
        .bind(user_id)
        .bind(credit_delta)
        .bind(search_delta)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn all_ids(&self) -> Result<Vec<i64>, StoreError> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT user_id FROM accounts ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}
