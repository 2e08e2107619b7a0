//! Transaction repository trait.

use async_trait::async_trait;

use super::transactions_model::{Transaction, TransactionUpsert};
use crate::errors::Result;

#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Inserts or updates a row keyed by the provider transaction id.
    ///
    /// When the row already exists, every provider-refreshable field is
    /// replaced except `plaid_merchant_name`, which keeps its stored value
    /// once set.
    async fn upsert(&self, txn: TransactionUpsert) -> Result<()>;

    /// Applies a provider-side modification to an existing row.
    ///
    /// Returns `false` when no row with that id exists; a modify event never
    /// re-creates a missing row. `category_id`/`tag_id` are only overwritten
    /// when the caller resolved a value (`Some`); `None` leaves the stored
    /// classification unchanged.
    async fn apply_modify(&self, txn: TransactionUpsert) -> Result<bool>;

    /// Deletes by provider transaction id. Deleting an id that is not
    /// present is a no-op returning 0.
    async fn delete_by_external_id(&self, transaction_id: String) -> Result<usize>;

    /// Deletes every transaction (full-resync reset).
    async fn delete_all(&self) -> Result<usize>;

    /// Total number of stored transactions.
    fn count(&self) -> Result<i64>;

    /// Fetches one transaction by provider id.
    fn get_by_external_id(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Lists transactions for one account, newest first.
    fn list_by_account(&self, account_id: &str, limit: i64) -> Result<Vec<Transaction>>;

    /// Back-fills category/tag defaults onto all transactions carrying the
    /// given merchant name. Returns the number of rows touched.
    async fn backfill_merchant_defaults(
        &self,
        merchant_name: String,
        category_id: Option<String>,
        tag_id: Option<String>,
    ) -> Result<usize>;
}
