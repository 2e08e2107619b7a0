//! Account repository trait.
//!
//! Database-agnostic contract implemented by the storage layer. Read paths
//! are synchronous (pooled connection); mutations go through the serialized
//! writer and are therefore async.

use async_trait::async_trait;

use super::accounts_model::{Account, AccountUpdate, NewAccount, SyncStatus};
use crate::errors::Result;

#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account row.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Applies UI-facing overrides (custom name, hidden flag).
    async fn update(&self, update: AccountUpdate) -> Result<Account>;

    /// Retrieves an account by its local ID.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Lists accounts, optionally filtered by sync status.
    fn list(&self, status: Option<SyncStatus>) -> Result<Vec<Account>>;

    /// Lists every account belonging to one institution/item.
    fn list_by_item(&self, item_id: &str) -> Result<Vec<Account>>;

    /// Nulls the cursor on every account (full-resync reset).
    async fn reset_all_cursors(&self) -> Result<()>;

    /// Persists the item's cursor and sync timestamp onto all of its
    /// accounts. Called even when the balance fetch failed, so an otherwise
    /// successful page loop never loses its continuation token.
    async fn save_item_sync_progress(&self, item_id: String, cursor: Option<String>) -> Result<()>;

    /// Sets the sync status (and error message) on all accounts of an item.
    async fn set_item_status(
        &self,
        item_id: String,
        status: SyncStatus,
        error_message: Option<String>,
    ) -> Result<()>;

    /// Refreshes provider-reported balances on one account.
    async fn update_balances(
        &self,
        account_id: String,
        current: Option<rust_decimal::Decimal>,
        available: Option<rust_decimal::Decimal>,
    ) -> Result<()>;

    /// Adopts a provider account identifier onto a pre-migration local row.
    async fn adopt_external_id(&self, account_id: String, plaid_account_id: String) -> Result<()>;

    /// Soft-removes an account the provider no longer returns.
    async fn deactivate(&self, account_id: String, reason: String) -> Result<()>;
}
