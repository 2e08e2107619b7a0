//! Database model for accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketledger_core::accounts::{Account, NewAccount, SyncStatus};

use crate::decimal_text::{opt_decimal_to_text, parse_opt_decimal};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub item_id: String,
    pub plaid_account_id: Option<String>,
    pub access_token: String,
    pub institution_name: Option<String>,
    pub name: String,
    pub custom_name: Option<String>,
    pub hidden: bool,
    pub account_type: String,
    pub subtype: Option<String>,
    pub currency: String,
    pub current_balance: Option<String>,
    pub available_balance: Option<String>,
    pub cursor: Option<String>,
    pub sync_status: String,
    pub error_message: Option<String>,
    pub last_synced_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            current_balance: parse_opt_decimal(db.current_balance.as_deref(), "current_balance"),
            available_balance: parse_opt_decimal(
                db.available_balance.as_deref(),
                "available_balance",
            ),
            sync_status: SyncStatus::parse(&db.sync_status),
            id: db.id,
            item_id: db.item_id,
            plaid_account_id: db.plaid_account_id,
            access_token: db.access_token,
            institution_name: db.institution_name,
            name: db.name,
            custom_name: db.custom_name,
            hidden: db.hidden,
            account_type: db.account_type,
            subtype: db.subtype,
            currency: db.currency,
            cursor: db.cursor,
            error_message: db.error_message,
            last_synced_at: db.last_synced_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            item_id: domain.item_id,
            plaid_account_id: domain.plaid_account_id,
            access_token: domain.access_token,
            institution_name: domain.institution_name,
            name: domain.name,
            custom_name: None,
            hidden: false,
            account_type: domain.account_type,
            subtype: domain.subtype,
            currency: domain.currency,
            current_balance: opt_decimal_to_text(domain.current_balance.as_ref()),
            available_balance: opt_decimal_to_text(domain.available_balance.as_ref()),
            cursor: None,
            sync_status: SyncStatus::Active.as_str().to_string(),
            error_message: None,
            last_synced_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
