//! The account persistence contract shared by every backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// A persisted user account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub user_id: i64,
    pub first_name: String,
    pub username: Option<String>,
    pub credits: i64,
    pub searches: i64,
    pub joined_at: DateTime<Utc>,
}

/// Profile details captured at first contact, before a row exists.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: i64,
    pub first_name: String,
    pub username: Option<String>,
    pub credits: i64,
}

/// Keyed account storage. All mutation goes through [`AccountStore::adjust`]
/// so concurrent updates against the same row cannot lose increments.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts the account unless a row already exists for its id.
    /// Returns whether a row was actually created.
    async fn create_if_absent(&self, account: NewAccount) -> Result<bool, StoreError>;

    async fn get(&self, user_id: i64) -> Result<Option<Account>, StoreError>;

    /// Applies `credit_delta` and `search_delta` in one atomic operation.
    /// The update is rejected (returning `false`) when no row exists for
    /// `user_id` or when either resulting counter would go negative.
    async fn adjust(
        &self,
        user_id: i64,
        credit_delta: i64,
        search_delta: i64,
    ) -> Result<bool, StoreError>;

    /// Total number of registered accounts.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Every registered account id, for broadcast enumeration.
    async fn all_ids(&self) -> Result<Vec<i64>, StoreError>;
}
