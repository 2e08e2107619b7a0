//! Wire types for the Plaid REST API.
//!
//! Field names mirror Plaid's snake_case JSON. Everything the API marks
//! nullable is optional here, with defaults, so schema drift degrades to
//! missing data instead of failed syncs.

use chrono::NaiveDate;
use pocketledger_core::sync::{
    ProviderAccount, ProviderInvestmentTransaction, ProviderRemovedTransaction, ProviderSecurity,
    ProviderTransaction,
};
use pocketledger_core::transactions::{
    Counterparty, PaymentMeta, PersonalFinanceCategory, TransactionLocation,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured error envelope returned by every Plaid endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaidErrorResponse {
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub display_message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkTokenCreateResponse {
    pub link_token: String,
    #[serde(default)]
    pub expiration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicTokenExchangeResponse {
    pub access_token: String,
    pub item_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaidItem {
    pub item_id: String,
    #[serde(default)]
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemGetResponse {
    pub item: PlaidItem,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaidInstitution {
    pub institution_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionsGetByIdResponse {
    pub institution: PlaidInstitution,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaidBalances {
    #[serde(default)]
    pub available: Option<Decimal>,
    #[serde(default)]
    pub current: Option<Decimal>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
    #[serde(default)]
    pub unofficial_currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaidAccount {
    pub account_id: String,
    #[serde(default)]
    pub balances: PlaidBalances,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountsGetResponse {
    pub accounts: Vec<PlaidAccount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaidLocation {
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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaidPaymentMeta {
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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaidPersonalFinanceCategory {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub detailed: Option<String>,
    #[serde(default)]
    pub confidence_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaidCounterparty {
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

#[derive(Debug, Clone, Deserialize)]
pub struct PlaidTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub merchant_entity_id: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
    #[serde(default)]
    pub unofficial_currency_code: Option<String>,
    #[serde(default)]
    pub location: Option<PlaidLocation>,
    #[serde(default)]
    pub payment_meta: Option<PlaidPaymentMeta>,
    #[serde(default)]
    pub personal_finance_category: Option<PlaidPersonalFinanceCategory>,
    #[serde(default)]
    pub counterparties: Vec<PlaidCounterparty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaidRemovedTransaction {
    pub transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsSyncResponse {
    #[serde(default)]
    pub added: Vec<PlaidTransaction>,
    #[serde(default)]
    pub modified: Vec<PlaidTransaction>,
    #[serde(default)]
    pub removed: Vec<PlaidRemovedTransaction>,
    pub next_cursor: String,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaidSecurity {
    pub security_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ticker_symbol: Option<String>,
    #[serde(rename = "type", default)]
    pub security_type: Option<String>,
    #[serde(default)]
    pub close_price: Option<Decimal>,
    #[serde(default)]
    pub close_price_as_of: Option<NaiveDate>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaidInvestmentTransaction {
    pub investment_transaction_id: String,
    pub account_id: String,
    #[serde(default)]
    pub security_id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub fees: Option<Decimal>,
    #[serde(rename = "type", default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvestmentsTransactionsGetResponse {
    #[serde(default)]
    pub investment_transactions: Vec<PlaidInvestmentTransaction>,
    #[serde(default)]
    pub securities: Vec<PlaidSecurity>,
    #[serde(default)]
    pub total_investment_transactions: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingsGetResponse {
    #[serde(default)]
    pub securities: Vec<PlaidSecurity>,
}

/// Request bodies. Credentials are injected by the client, not carried here.
#[derive(Debug, Clone, Serialize)]
pub struct LinkTokenUser {
    pub client_user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkTokenCreateRequest {
    pub client_name: String,
    pub user: LinkTokenUser,
    pub products: Vec<String>,
    pub country_codes: Vec<String>,
    pub language: String,
}

impl From<PlaidLocation> for TransactionLocation {
    fn from(loc: PlaidLocation) -> Self {
        TransactionLocation {
            address: loc.address,
            city: loc.city,
            region: loc.region,
            postal_code: loc.postal_code,
            country: loc.country,
            lat: loc.lat,
            lon: loc.lon,
        }
    }
}

impl From<PlaidPaymentMeta> for PaymentMeta {
    fn from(meta: PlaidPaymentMeta) -> Self {
        PaymentMeta {
            reference_number: meta.reference_number,
            ppd_id: meta.ppd_id,
            payee: meta.payee,
            payer: meta.payer,
            payment_method: meta.payment_method,
            payment_processor: meta.payment_processor,
            reason: meta.reason,
        }
    }
}

impl From<PlaidPersonalFinanceCategory> for PersonalFinanceCategory {
    fn from(pfc: PlaidPersonalFinanceCategory) -> Self {
        PersonalFinanceCategory {
            primary: pfc.primary,
            detailed: pfc.detailed,
            confidence_level: pfc.confidence_level,
        }
    }
}

impl From<PlaidCounterparty> for Counterparty {
    fn from(cp: PlaidCounterparty) -> Self {
        Counterparty {
            name: cp.name,
            counterparty_type: cp.counterparty_type,
            entity_id: cp.entity_id,
            logo_url: cp.logo_url,
            website: cp.website,
            confidence_level: cp.confidence_level,
        }
    }
}

impl From<PlaidTransaction> for ProviderTransaction {
    fn from(txn: PlaidTransaction) -> Self {
        let currency = txn.iso_currency_code.or(txn.unofficial_currency_code);
        ProviderTransaction {
            transaction_id: txn.transaction_id,
            account_id: txn.account_id,
            date: txn.date,
            amount: txn.amount,
            name: txn.name.unwrap_or_default(),
            merchant_name: txn.merchant_name,
            merchant_entity_id: txn.merchant_entity_id,
            pending: txn.pending,
            currency,
            location: txn.location.map(Into::into),
            payment_meta: txn.payment_meta.map(Into::into),
            personal_finance_category: txn.personal_finance_category.map(Into::into),
            counterparties: txn.counterparties.into_iter().map(Into::into).collect(),
            logo_url: txn.logo_url,
        }
    }
}

impl From<PlaidRemovedTransaction> for ProviderRemovedTransaction {
    fn from(removed: PlaidRemovedTransaction) -> Self {
        ProviderRemovedTransaction {
            transaction_id: removed.transaction_id,
        }
    }
}

impl From<PlaidAccount> for ProviderAccount {
    fn from(account: PlaidAccount) -> Self {
        let currency = account
            .balances
            .iso_currency_code
            .clone()
            .or(account.balances.unofficial_currency_code.clone());
        ProviderAccount {
            account_id: account.account_id,
            name: account.name,
            official_name: account.official_name,
            account_type: account.account_type,
            subtype: account.subtype,
            currency,
            current_balance: account.balances.current,
            available_balance: account.balances.available,
        }
    }
}

impl From<PlaidSecurity> for ProviderSecurity {
    fn from(security: PlaidSecurity) -> Self {
        ProviderSecurity {
            security_id: security.security_id,
            name: security.name,
            ticker_symbol: security.ticker_symbol,
            security_type: security.security_type,
            close_price: security.close_price,
            close_price_as_of: security.close_price_as_of,
            currency: security.iso_currency_code,
        }
    }
}

impl From<PlaidInvestmentTransaction> for ProviderInvestmentTransaction {
    fn from(txn: PlaidInvestmentTransaction) -> Self {
        ProviderInvestmentTransaction {
            investment_transaction_id: txn.investment_transaction_id,
            account_id: txn.account_id,
            security_id: txn.security_id,
            date: txn.date,
            name: txn.name,
            quantity: txn.quantity,
            amount: txn.amount,
            price: txn.price,
            fees: txn.fees,
            transaction_type: txn.transaction_type,
            subtype: txn.subtype,
            currency: txn.iso_currency_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn transactions_sync_response_parses_real_shape() {
        let body = r#"{
            "added": [{
                "transaction_id": "txn-1",
                "account_id": "acc-1",
                "amount": 12.5,
                "date": "2026-08-20",
                "name": "ACME COFFEE",
                "merchant_name": "Acme Coffee",
                "merchant_entity_id": "entity-42",
                "pending": false,
                "iso_currency_code": "USD",
                "personal_finance_category": {
                    "primary": "FOOD_AND_DRINK",
                    "detailed": "FOOD_AND_DRINK_RESTAURANTS",
                    "confidence_level": "VERY_HIGH"
                },
                "counterparties": [{"name": "Acme Coffee", "type": "merchant"}]
            }],
            "modified": [],
            "removed": [{"transaction_id": "txn-0"}],
            "next_cursor": "cursor-abc",
            "has_more": true
        }"#;

        let parsed: TransactionsSyncResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.added.len(), 1);
        assert_eq!(parsed.removed.len(), 1);
        assert!(parsed.has_more);

        let txn: ProviderTransaction = parsed.added[0].clone().into();
        assert_eq!(txn.amount, dec!(12.5));
        assert_eq!(txn.merchant_entity_id.as_deref(), Some("entity-42"));
        assert_eq!(txn.counterparties.len(), 1);
        assert_eq!(
            txn.personal_finance_category.unwrap().detailed.as_deref(),
            Some("FOOD_AND_DRINK_RESTAURANTS")
        );
    }

    #[test]
    fn account_without_balances_still_parses() {
        let body = r#"{"account_id": "acc-1", "name": "Checking", "type": "depository"}"#;
        let parsed: PlaidAccount = serde_json::from_str(body).unwrap();
        let account: ProviderAccount = parsed.into();
        assert_eq!(account.account_id, "acc-1");
        assert!(account.current_balance.is_none());
        assert!(account.currency.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = r#"{
            "transaction_id": "txn-1",
            "account_id": "acc-1",
            "amount": 3,
            "date": "2026-01-02",
            "brand_new_field": {"nested": true}
        }"#;
        let parsed: PlaidTransaction = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.transaction_id, "txn-1");
        assert!(parsed.merchant_name.is_none());
    }
}
