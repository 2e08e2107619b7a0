//! Aggregator client seam.
//!
//! The sync pipeline talks to the account aggregator exclusively through
//! [`AggregatorClient`], with provider-shaped DTOs that carry the provider's
//! sign convention (expenses positive). The concrete HTTP client lives in a
//! separate crate.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::transactions::{Counterparty, PaymentMeta, PersonalFinanceCategory, TransactionLocation};

/// One transaction as reported by the aggregator. `amount` keeps the
/// provider's convention: positive for money leaving the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub name: String,
    pub merchant_name: Option<String>,
    pub merchant_entity_id: Option<String>,
    pub pending: bool,
    pub currency: Option<String>,
    pub location: Option<TransactionLocation>,
    pub payment_meta: Option<PaymentMeta>,
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    #[serde(default)]
    pub counterparties: Vec<Counterparty>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRemovedTransaction {
    pub transaction_id: String,
}

/// One page of the cursor-based transaction feed.
#[derive(Debug, Clone, Default)]
pub struct SyncPage {
    pub added: Vec<ProviderTransaction>,
    pub modified: Vec<ProviderTransaction>,
    pub removed: Vec<ProviderRemovedTransaction>,
    pub next_cursor: String,
    pub has_more: bool,
}

/// Current account state as reported by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAccount {
    pub account_id: String,
    pub name: Option<String>,
    pub official_name: Option<String>,
    pub account_type: Option<String>,
    pub subtype: Option<String>,
    pub currency: Option<String>,
    pub current_balance: Option<Decimal>,
    pub available_balance: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSecurity {
    pub security_id: String,
    pub name: Option<String>,
    pub ticker_symbol: Option<String>,
    pub security_type: Option<String>,
    pub close_price: Option<Decimal>,
    pub close_price_as_of: Option<NaiveDate>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInvestmentTransaction {
    pub investment_transaction_id: String,
    pub account_id: String,
    pub security_id: Option<String>,
    pub date: NaiveDate,
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub price: Option<Decimal>,
    pub fees: Option<Decimal>,
    pub transaction_type: Option<String>,
    pub subtype: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InvestmentsPage {
    pub securities: Vec<ProviderSecurity>,
    pub investment_transactions: Vec<ProviderInvestmentTransaction>,
}

/// Aggregator operations the sync pipeline depends on.
#[async_trait]
pub trait AggregatorClient: Send + Sync {
    /// Fetches one page of the incremental transaction feed. `cursor` is
    /// `None` for the start of history.
    async fn transactions_sync(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<SyncPage>;

    /// Fetches the current account list and balances for an item.
    async fn account_snapshot(&self, access_token: &str) -> Result<Vec<ProviderAccount>>;

    /// Fetches securities and investment transactions for a date window.
    async fn investments(
        &self,
        access_token: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<InvestmentsPage>;
}
