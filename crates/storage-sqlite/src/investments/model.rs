//! Database models for securities and investment transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use pocketledger_core::investments::{
    InvestmentTransaction, InvestmentTransactionUpsert, Security, SecurityUpsert,
};

use crate::decimal_text::{opt_decimal_to_text, parse_opt_decimal};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::securities)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SecurityDB {
    pub id: String,
    pub name: Option<String>,
    pub ticker_symbol: Option<String>,
    pub security_type: Option<String>,
    pub close_price: Option<String>,
    pub close_price_as_of: Option<NaiveDate>,
    pub currency: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SecurityDB> for Security {
    fn from(db: SecurityDB) -> Self {
        Self {
            close_price: parse_opt_decimal(db.close_price.as_deref(), "close_price"),
            id: db.id,
            name: db.name,
            ticker_symbol: db.ticker_symbol,
            security_type: db.security_type,
            close_price_as_of: db.close_price_as_of,
            currency: db.currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<SecurityUpsert> for SecurityDB {
    fn from(domain: SecurityUpsert) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id,
            name: domain.name,
            ticker_symbol: domain.ticker_symbol,
            security_type: domain.security_type,
            close_price: opt_decimal_to_text(domain.close_price.as_ref()),
            close_price_as_of: domain.close_price_as_of,
            currency: domain.currency,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::investment_transactions)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentTransactionDB {
    pub id: String,
    pub account_id: String,
    pub security_id: Option<String>,
    pub date: NaiveDate,
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub amount: Option<String>,
    pub price: Option<String>,
    pub fees: Option<String>,
    pub transaction_type: Option<String>,
    pub subtype: Option<String>,
    pub currency: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InvestmentTransactionDB> for InvestmentTransaction {
    fn from(db: InvestmentTransactionDB) -> Self {
        Self {
            quantity: parse_opt_decimal(db.quantity.as_deref(), "quantity"),
            amount: parse_opt_decimal(db.amount.as_deref(), "amount"),
            price: parse_opt_decimal(db.price.as_deref(), "price"),
            fees: parse_opt_decimal(db.fees.as_deref(), "fees"),
            id: db.id,
            account_id: db.account_id,
            security_id: db.security_id,
            date: db.date,
            name: db.name,
            transaction_type: db.transaction_type,
            subtype: db.subtype,
            currency: db.currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<InvestmentTransactionUpsert> for InvestmentTransactionDB {
    fn from(domain: InvestmentTransactionUpsert) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id,
            account_id: domain.account_id,
            security_id: domain.security_id,
            date: domain.date,
            name: domain.name,
            quantity: opt_decimal_to_text(domain.quantity.as_ref()),
            amount: opt_decimal_to_text(domain.amount.as_ref()),
            price: opt_decimal_to_text(domain.price.as_ref()),
            fees: opt_decimal_to_text(domain.fees.as_ref()),
            transaction_type: domain.transaction_type,
            subtype: domain.subtype,
            currency: domain.currency,
            created_at: now,
            updated_at: now,
        }
    }
}
