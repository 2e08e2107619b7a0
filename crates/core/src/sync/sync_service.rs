//! Sync orchestration service.
//!
//! Drives the aggregator's incremental transaction feed per institution
//! item, applies auto-categorization, refreshes investment data and
//! reconciles the account list. Institutions are synced sequentially; a
//! failure in one institution marks its accounts as errored and never
//! aborts the others.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Months, Utc};
use log::{debug, error, info, warn};

use crate::accounts::{Account, AccountRepositoryTrait, NewAccount, SyncStatus};
use crate::errors::{Error, Result};
use crate::investments::{
    InvestmentRepositoryTrait, InvestmentTransactionUpsert, SecurityUpsert,
};
use crate::sync::aggregator::{AggregatorClient, ProviderTransaction, SyncPage};
use crate::sync::categorization::Categorizer;
use crate::sync::reconciliation::{plan_account_reconciliation, ReconcileAction};
use crate::sync::sync_model::{ItemSyncCounts, SyncSummary};
use crate::transactions::{TransactionRepositoryTrait, TransactionUpsert};

/// How far back investment history is pulled on each pass.
const INVESTMENT_WINDOW_MONTHS: u32 = 24;

pub struct SyncService {
    aggregator: Arc<dyn AggregatorClient>,
    account_repo: Arc<dyn AccountRepositoryTrait>,
    transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    investment_repo: Arc<dyn InvestmentRepositoryTrait>,
    categorizer: Categorizer,
}

impl SyncService {
    pub fn new(
        aggregator: Arc<dyn AggregatorClient>,
        account_repo: Arc<dyn AccountRepositoryTrait>,
        transaction_repo: Arc<dyn TransactionRepositoryTrait>,
        investment_repo: Arc<dyn InvestmentRepositoryTrait>,
        categorizer: Categorizer,
    ) -> Self {
        Self {
            aggregator,
            account_repo,
            transaction_repo,
            investment_repo,
            categorizer,
        }
    }

    /// Full resync: wipes all transactions, nulls every cursor and replays
    /// complete history for every active account, institution by
    /// institution.
    pub async fn full_resync(&self) -> Result<SyncSummary> {
        let wiped = self.transaction_repo.delete_all().await?;
        self.account_repo.reset_all_cursors().await?;
        info!("Full resync started, {} stored transactions wiped", wiped);

        let accounts = self.account_repo.list(Some(SyncStatus::Active))?;
        let mut items: BTreeMap<String, Vec<Account>> = BTreeMap::new();
        for account in accounts {
            items.entry(account.item_id.clone()).or_default().push(account);
        }

        let mut summary = SyncSummary::default();
        for (item_id, item_accounts) in items {
            match self.sync_institution(&item_id, &item_accounts, None).await {
                Ok(counts) => {
                    summary.accounts_synced += item_accounts.len();
                    summary.added += counts.added;
                    summary.modified += counts.modified;
                    summary.removed += counts.removed;
                }
                Err(err) => {
                    error!("Sync failed for item {}: {}", item_id, err);
                    self.account_repo
                        .set_item_status(
                            item_id.clone(),
                            SyncStatus::Error,
                            Some(err.to_string()),
                        )
                        .await?;
                }
            }
        }

        summary.total_in_database = self.transaction_repo.count()?;
        info!(
            "Full resync finished: {} added, {} modified, {} removed, {} total",
            summary.added, summary.modified, summary.removed, summary.total_in_database
        );
        Ok(summary)
    }

    /// Incremental sync of one item from its stored cursor. Used by the
    /// webhook path.
    pub async fn sync_item(&self, item_id: &str) -> Result<ItemSyncCounts> {
        let accounts: Vec<Account> = self
            .account_repo
            .list_by_item(item_id)?
            .into_iter()
            .filter(|a| a.sync_status != SyncStatus::Inactive)
            .collect();

        if accounts.is_empty() {
            debug!("Ignoring sync request for unknown item {}", item_id);
            return Ok(ItemSyncCounts::default());
        }

        let cursor = accounts[0].cursor.clone();
        match self.sync_institution(item_id, &accounts, cursor).await {
            Ok(counts) => Ok(counts),
            Err(err) => {
                error!("Sync failed for item {}: {}", item_id, err);
                self.account_repo
                    .set_item_status(item_id.to_string(), SyncStatus::Error, Some(err.to_string()))
                    .await?;
                Err(err)
            }
        }
    }

    /// Pages the transaction feed for one institution, then refreshes
    /// investments and balances.
    async fn sync_institution(
        &self,
        item_id: &str,
        accounts: &[Account],
        mut cursor: Option<String>,
    ) -> Result<ItemSyncCounts> {
        let first = accounts
            .first()
            .ok_or_else(|| Error::Unexpected(format!("item {} has no accounts", item_id)))?;
        let access_token = first.access_token.clone();

        let account_ids: HashMap<String, String> = accounts
            .iter()
            .filter_map(|a| {
                a.plaid_account_id
                    .as_ref()
                    .map(|external| (external.clone(), a.id.clone()))
            })
            .collect();

        info!(
            "Syncing item {} ({} accounts, cursor {})",
            item_id,
            accounts.len(),
            if cursor.is_some() { "stored" } else { "none" }
        );

        let mut counts = ItemSyncCounts::default();
        loop {
            let page = self
                .aggregator
                .transactions_sync(&access_token, cursor.as_deref())
                .await?;
            counts.absorb(self.apply_page(first, &account_ids, &page).await);
            cursor = Some(page.next_cursor);
            if !page.has_more {
                break;
            }
        }

        // An investments failure is an aggregator failure like any other:
        // the caller marks the whole item errored.
        if accounts.iter().any(Account::is_investment) {
            self.sync_investments(&access_token, first, &account_ids)
                .await?;
        }

        match self.aggregator.account_snapshot(&access_token).await {
            Ok(snapshot) => {
                self.apply_reconciliation(item_id, accounts, &snapshot).await?;
                self.account_repo
                    .save_item_sync_progress(item_id.to_string(), cursor)
                    .await?;
                self.account_repo
                    .set_item_status(item_id.to_string(), SyncStatus::Active, None)
                    .await?;
            }
            // The page loop already succeeded: keep the cursor so the next
            // run continues incrementally, but surface the balance failure.
            Err(err) => {
                warn!("Balance refresh failed for item {}: {}", item_id, err);
                self.account_repo
                    .save_item_sync_progress(item_id.to_string(), cursor)
                    .await?;
                self.account_repo
                    .set_item_status(
                        item_id.to_string(),
                        SyncStatus::Error,
                        Some(format!("balance refresh failed: {}", err)),
                    )
                    .await?;
            }
        }

        Ok(counts)
    }

    /// Applies one feed page. Row-level failures are logged and skipped so a
    /// single bad row never poisons the page.
    async fn apply_page(
        &self,
        fallback_account: &Account,
        account_ids: &HashMap<String, String>,
        page: &SyncPage,
    ) -> ItemSyncCounts {
        let mut counts = ItemSyncCounts::default();

        for txn in &page.added {
            match self.apply_added(fallback_account, account_ids, txn).await {
                Ok(()) => counts.added += 1,
                Err(err) => error!("Failed to ingest transaction {}: {}", txn.transaction_id, err),
            }
        }

        for txn in &page.modified {
            match self.apply_modified(fallback_account, account_ids, txn).await {
                Ok(true) => counts.modified += 1,
                Ok(false) => debug!(
                    "Skipping modify for unknown transaction {}",
                    txn.transaction_id
                ),
                Err(err) => error!(
                    "Failed to apply modification to {}: {}",
                    txn.transaction_id, err
                ),
            }
        }

        for removed in &page.removed {
            match self
                .transaction_repo
                .delete_by_external_id(removed.transaction_id.clone())
                .await
            {
                Ok(n) => counts.removed += n,
                Err(err) => error!(
                    "Failed to remove transaction {}: {}",
                    removed.transaction_id, err
                ),
            }
        }

        counts
    }

    async fn apply_added(
        &self,
        fallback_account: &Account,
        account_ids: &HashMap<String, String>,
        txn: &ProviderTransaction,
    ) -> Result<()> {
        let classification = self.categorizer.resolve_for_added(txn).await?;
        let upsert = self.build_upsert(fallback_account, account_ids, txn, classification);
        self.transaction_repo.upsert(upsert).await
    }

    async fn apply_modified(
        &self,
        fallback_account: &Account,
        account_ids: &HashMap<String, String>,
        txn: &ProviderTransaction,
    ) -> Result<bool> {
        let classification = self.categorizer.resolve_for_modified(txn).await?;
        let upsert = self.build_upsert(fallback_account, account_ids, txn, classification);
        self.transaction_repo.apply_modify(upsert).await
    }

    fn build_upsert(
        &self,
        fallback_account: &Account,
        account_ids: &HashMap<String, String>,
        txn: &ProviderTransaction,
        classification: crate::sync::categorization::Classification,
    ) -> TransactionUpsert {
        let account_id = match account_ids.get(&txn.account_id) {
            Some(local_id) => local_id.clone(),
            // Accounts linked before external ids were stored cannot be
            // matched per row; attribute to the item's first account.
            None => {
                warn!(
                    "No local account for provider account {}, attributing to {}",
                    txn.account_id, fallback_account.id
                );
                fallback_account.id.clone()
            }
        };

        let category_confidence = txn
            .personal_finance_category
            .as_ref()
            .and_then(|pfc| pfc.confidence_level.clone());

        TransactionUpsert {
            id: txn.transaction_id.clone(),
            account_id,
            date: txn.date,
            // Provider reports expenses positive; local convention is the
            // opposite.
            amount: -txn.amount,
            name: txn.name.clone(),
            merchant_name: txn.merchant_name.clone(),
            plaid_merchant_name: txn.merchant_name.clone(),
            category_id: classification.category_id,
            tag_id: classification.tag_id,
            pending: txn.pending,
            currency: txn.currency.clone(),
            location: txn.location.clone(),
            payment_meta: txn.payment_meta.clone(),
            personal_finance_category: txn.personal_finance_category.clone(),
            counterparties: if txn.counterparties.is_empty() {
                None
            } else {
                Some(txn.counterparties.clone())
            },
            category_confidence,
            logo_url: txn.logo_url.clone(),
        }
    }

    async fn sync_investments(
        &self,
        access_token: &str,
        fallback_account: &Account,
        account_ids: &HashMap<String, String>,
    ) -> Result<()> {
        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_months(Months::new(INVESTMENT_WINDOW_MONTHS))
            .unwrap_or(end);

        let page = self.aggregator.investments(access_token, start, end).await?;

        let securities: Vec<SecurityUpsert> = page
            .securities
            .into_iter()
            .map(|s| SecurityUpsert {
                id: s.security_id,
                name: s.name,
                ticker_symbol: s.ticker_symbol,
                security_type: s.security_type,
                close_price: s.close_price,
                close_price_as_of: s.close_price_as_of,
                currency: s.currency,
            })
            .collect();
        let stored_securities = self.investment_repo.upsert_securities(securities).await?;

        let transactions: Vec<InvestmentTransactionUpsert> = page
            .investment_transactions
            .into_iter()
            .map(|t| {
                let account_id = account_ids
                    .get(&t.account_id)
                    .cloned()
                    .unwrap_or_else(|| fallback_account.id.clone());
                InvestmentTransactionUpsert {
                    id: t.investment_transaction_id,
                    account_id,
                    security_id: t.security_id,
                    date: t.date,
                    name: t.name,
                    quantity: t.quantity,
                    amount: t.amount,
                    price: t.price,
                    fees: t.fees,
                    transaction_type: t.transaction_type,
                    subtype: t.subtype,
                    currency: t.currency,
                }
            })
            .collect();
        let stored_transactions = self
            .investment_repo
            .upsert_investment_transactions(transactions)
            .await?;

        debug!(
            "Investment refresh stored {} securities, {} transactions",
            stored_securities, stored_transactions
        );
        Ok(())
    }

    async fn apply_reconciliation(
        &self,
        item_id: &str,
        accounts: &[Account],
        snapshot: &[crate::sync::aggregator::ProviderAccount],
    ) -> Result<()> {
        let first = accounts
            .first()
            .ok_or_else(|| Error::Unexpected(format!("item {} has no accounts", item_id)))?;

        for action in plan_account_reconciliation(accounts, snapshot) {
            match action {
                ReconcileAction::UpdateMatched { account_id, provider } => {
                    self.account_repo
                        .update_balances(
                            account_id,
                            provider.current_balance,
                            provider.available_balance,
                        )
                        .await?;
                }
                ReconcileAction::AdoptExternalId { account_id, provider } => {
                    info!(
                        "Adopting external id {} onto account {}",
                        provider.account_id, account_id
                    );
                    self.account_repo
                        .adopt_external_id(account_id.clone(), provider.account_id.clone())
                        .await?;
                    self.account_repo
                        .update_balances(
                            account_id,
                            provider.current_balance,
                            provider.available_balance,
                        )
                        .await?;
                }
                ReconcileAction::CreateAccount(provider) => {
                    let name = provider
                        .name
                        .or(provider.official_name)
                        .unwrap_or_else(|| "Account".to_string());
                    info!("Creating account '{}' for item {}", name, item_id);
                    self.account_repo
                        .create(NewAccount {
                            id: None,
                            item_id: item_id.to_string(),
                            plaid_account_id: Some(provider.account_id),
                            access_token: first.access_token.clone(),
                            institution_name: first.institution_name.clone(),
                            name,
                            account_type: provider
                                .account_type
                                .unwrap_or_else(|| "depository".to_string()),
                            subtype: provider.subtype,
                            currency: provider.currency.unwrap_or_else(|| "USD".to_string()),
                            current_balance: provider.current_balance,
                            available_balance: provider.available_balance,
                        })
                        .await?;
                }
                ReconcileAction::Deactivate { account_id } => {
                    info!("Deactivating account {} no longer reported", account_id);
                    self.account_repo
                        .deactivate(account_id, "no longer reported by provider".to_string())
                        .await?;
                }
            }
        }

        Ok(())
    }
}
