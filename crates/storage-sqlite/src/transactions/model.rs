//! Database model for transactions.
//!
//! Structured provider metadata (location, payment meta, classification,
//! counterparties) is stored as JSON text; malformed blobs read back as
//! absent.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;

use pocketledger_core::transactions::{parse_json_blob, Transaction, TransactionUpsert};

use crate::decimal_text::{decimal_to_text, parse_decimal_tolerant};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub amount: String,
    pub name: String,
    pub merchant_name: Option<String>,
    pub plaid_merchant_name: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub pending: bool,
    pub currency: Option<String>,
    pub location: Option<String>,
    pub payment_meta: Option<String>,
    pub personal_finance_category: Option<String>,
    pub counterparties: Option<String>,
    pub category_confidence: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn to_json_blob<T: Serialize>(value: Option<&T>) -> Option<String> {
    let value = value?;
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(err) => {
            log::warn!("Dropping unserializable metadata blob: {}", err);
            None
        }
    }
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            amount: parse_decimal_tolerant(&db.amount, "amount"),
            location: parse_json_blob(db.location.as_deref()),
            payment_meta: parse_json_blob(db.payment_meta.as_deref()),
            personal_finance_category: parse_json_blob(db.personal_finance_category.as_deref()),
            counterparties: parse_json_blob(db.counterparties.as_deref()),
            id: db.id,
            account_id: db.account_id,
            date: db.date,
            name: db.name,
            merchant_name: db.merchant_name,
            plaid_merchant_name: db.plaid_merchant_name,
            category_id: db.category_id,
            tag_id: db.tag_id,
            pending: db.pending,
            currency: db.currency,
            category_confidence: db.category_confidence,
            logo_url: db.logo_url,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<TransactionUpsert> for TransactionDB {
    fn from(domain: TransactionUpsert) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id,
            account_id: domain.account_id,
            date: domain.date,
            amount: decimal_to_text(&domain.amount),
            name: domain.name,
            merchant_name: domain.merchant_name,
            plaid_merchant_name: domain.plaid_merchant_name,
            category_id: domain.category_id,
            tag_id: domain.tag_id,
            pending: domain.pending,
            currency: domain.currency,
            location: to_json_blob(domain.location.as_ref()),
            payment_meta: to_json_blob(domain.payment_meta.as_ref()),
            personal_finance_category: to_json_blob(domain.personal_finance_category.as_ref()),
            counterparties: to_json_blob(domain.counterparties.as_ref()),
            category_confidence: domain.category_confidence,
            logo_url: domain.logo_url,
            created_at: now,
            updated_at: now,
        }
    }
}
