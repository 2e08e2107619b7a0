//! Transaction domain models.
//!
//! Transactions are keyed by the provider's stable transaction identifier and
//! upserted on every sync pass. The provider's expense-positive amounts are
//! negated on ingestion, so expenses are negative locally.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured location metadata attached by the provider. Every field is
/// optional; malformed JSON is treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Structured payment metadata attached by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMeta {
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub ppd_id: Option<String>,
    #[serde(default)]
    pub payee: Option<String>,
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_processor: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// The provider's fine-grained spending classification for a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonalFinanceCategory {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub detailed: Option<String>,
    #[serde(default)]
    pub confidence_level: Option<String>,
}

/// A counterparty the provider associated with the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Counterparty {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub counterparty_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub confidence_level: Option<String>,
}

/// Parses an optional stored JSON blob into a structured type.
///
/// Unknown or malformed JSON is treated as absent, not fatal.
pub fn parse_json_blob<T: serde::de::DeserializeOwned>(raw: Option<&str>) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Discarding malformed metadata blob: {}", err);
            None
        }
    }
}

/// Domain model representing one financial transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Provider transaction identifier; primary key and upsert target.
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    /// Signed amount. Expenses are negative.
    pub amount: Decimal,
    pub name: String,
    /// Display merchant name; user-editable.
    pub merchant_name: Option<String>,
    /// The merchant name originally reported by the provider. Once set it is
    /// never overwritten by subsequent syncs.
    pub plaid_merchant_name: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub pending: bool,
    pub currency: Option<String>,
    pub location: Option<TransactionLocation>,
    pub payment_meta: Option<PaymentMeta>,
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    pub counterparties: Option<Vec<Counterparty>>,
    pub category_confidence: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Write model for a sync-ingested transaction. The amount carries the local
/// sign convention (already negated).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpsert {
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub name: String,
    pub merchant_name: Option<String>,
    /// Candidate value for the preserved provider merchant name. Ignored by
    /// the repository when the stored row already carries one.
    pub plaid_merchant_name: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub pending: bool,
    pub currency: Option<String>,
    pub location: Option<TransactionLocation>,
    pub payment_meta: Option<PaymentMeta>,
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    pub counterparties: Option<Vec<Counterparty>>,
    pub category_confidence: Option<String>,
    pub logo_url: Option<String>,
}
