//! Investment domain models.
//!
//! Securities and investment transactions are provider-sourced reference
//! data for investment accounts. Securities are upserted before the
//! transactions that reference them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    /// Provider security identifier; primary key and upsert target.
    pub id: String,
    pub name: Option<String>,
    pub ticker_symbol: Option<String>,
    pub security_type: Option<String>,
    pub close_price: Option<Decimal>,
    pub close_price_as_of: Option<NaiveDate>,
    pub currency: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityUpsert {
    pub id: String,
    pub name: Option<String>,
    pub ticker_symbol: Option<String>,
    pub security_type: Option<String>,
    pub close_price: Option<Decimal>,
    pub close_price_as_of: Option<NaiveDate>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTransaction {
    /// Provider investment transaction identifier; primary key.
    pub id: String,
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTransactionUpsert {
    pub id: String,
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
