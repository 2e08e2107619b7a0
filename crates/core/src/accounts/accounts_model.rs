//! Account domain models.
//!
//! One `Account` row exists per bank/brokerage sub-account. All accounts that
//! belong to one institution share an `item_id` and an access token; the
//! incremental sync cursor is keyed by item, not by account, and is mirrored
//! onto every account row of the item.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Sync lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Active,
    Error,
    Inactive,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Active => "active",
            SyncStatus::Error => "error",
            SyncStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> SyncStatus {
        match value {
            "error" => SyncStatus::Error,
            "inactive" => SyncStatus::Inactive,
            _ => SyncStatus::Active,
        }
    }
}

/// Domain model representing a linked bank or brokerage account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    /// Institution/item identifier shared by all accounts of one credential.
    pub item_id: String,
    /// Account identifier in the provider's system. May be null during the
    /// pre-migration window; adopted on the first reconciliation pass.
    pub plaid_account_id: Option<String>,
    /// Provider access credential. Never serialized out of the process.
    #[serde(skip_serializing)]
    pub access_token: String,
    pub institution_name: Option<String>,
    pub name: String,
    /// UI override for the display name.
    pub custom_name: Option<String>,
    /// UI override to hide the account from dashboards.
    pub hidden: bool,
    pub account_type: String,
    pub subtype: Option<String>,
    pub currency: String,
    pub current_balance: Option<Decimal>,
    pub available_balance: Option<Decimal>,
    /// Opaque incremental-sync continuation token. Null means "resync from
    /// full history".
    pub cursor: Option<String>,
    pub sync_status: SyncStatus,
    pub error_message: Option<String>,
    pub last_synced_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// True when the account tracks brokerage holdings and should take part
    /// in the investment-transaction sync.
    pub fn is_investment(&self) -> bool {
        self.account_type.eq_ignore_ascii_case("investment")
            || self.account_type.eq_ignore_ascii_case("brokerage")
    }
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub item_id: String,
    pub plaid_account_id: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub institution_name: Option<String>,
    pub name: String,
    pub account_type: String,
    pub subtype: Option<String>,
    pub currency: String,
    pub current_balance: Option<Decimal>,
    pub available_balance: Option<Decimal>,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.item_id.trim().is_empty() {
            return Err(ValidationError::MissingField("itemId".to_string()).into());
        }
        if self.access_token.trim().is_empty() {
            return Err(ValidationError::MissingField("accessToken".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(())
    }
}

/// UI-facing mutable fields of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: String,
    pub custom_name: Option<String>,
    pub hidden: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_status_round_trips_through_db_strings() {
        for status in [SyncStatus::Active, SyncStatus::Error, SyncStatus::Inactive] {
            assert_eq!(SyncStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_string_defaults_to_active() {
        assert_eq!(SyncStatus::parse("weird"), SyncStatus::Active);
    }

    #[test]
    fn new_account_requires_item_and_token() {
        let account = NewAccount {
            id: None,
            item_id: "".to_string(),
            plaid_account_id: None,
            access_token: "tok".to_string(),
            institution_name: None,
            name: "Checking".to_string(),
            account_type: "depository".to_string(),
            subtype: None,
            currency: "USD".to_string(),
            current_balance: None,
            available_balance: None,
        };
        assert!(account.validate().is_err());
    }
}
