//! HTTP client for the Plaid REST API.
//!
//! Every Plaid endpoint is a JSON POST with `client_id` and `secret` in the
//! body; the client injects credentials so request types stay free of them.

use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{PlaidError, Result};
use crate::types::*;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Page size for /transactions/sync, the API maximum.
const TRANSACTIONS_SYNC_PAGE_SIZE: u32 = 500;
/// Page size for /investments/transactions/get, the API maximum.
const INVESTMENTS_PAGE_SIZE: u32 = 500;

/// Plaid API environment, selecting the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            PlaidEnvironment::Sandbox => "https://sandbox.plaid.com",
            PlaidEnvironment::Development => "https://development.plaid.com",
            PlaidEnvironment::Production => "https://production.plaid.com",
        }
    }

    /// Parses an environment name, defaulting unknown values to sandbox.
    pub fn parse(value: &str) -> PlaidEnvironment {
        match value.to_ascii_lowercase().as_str() {
            "production" => PlaidEnvironment::Production,
            "development" => PlaidEnvironment::Development,
            _ => PlaidEnvironment::Sandbox,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaidConfig {
    pub client_id: String,
    pub secret: String,
    pub environment: PlaidEnvironment,
}

/// Client for the Plaid REST API.
#[derive(Debug, Clone)]
pub struct PlaidClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl PlaidClient {
    pub fn new(config: PlaidConfig) -> Result<Self> {
        if config.client_id.trim().is_empty() || config.secret.trim().is_empty() {
            return Err(PlaidError::InvalidRequest(
                "Plaid client_id and secret are required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.environment.base_url().to_string(),
            client_id: config.client_id,
            secret: config.secret,
        })
    }

    /// POST a JSON body with credentials injected, parsing the response.
    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let payload = self.with_credentials(serde_json::to_value(body)?)?;

        debug!("POST {}", path);
        let response = self.client.post(&url).json(&payload).send().await?;
        Self::parse_response(response).await
    }

    fn with_credentials(&self, mut payload: Value) -> Result<Value> {
        let object = payload.as_object_mut().ok_or_else(|| {
            PlaidError::InvalidRequest("request body must be a JSON object".to_string())
        })?;
        object.insert("client_id".to_string(), Value::String(self.client_id.clone()));
        object.insert("secret".to_string(), Value::String(self.secret.clone()));
        Ok(payload)
    }

    /// Parse a JSON response body, mapping Plaid's error envelope.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<PlaidErrorResponse>(&body) {
                return Err(PlaidError::api(
                    status.as_u16(),
                    error.error_type,
                    error.error_code,
                    error
                        .display_message
                        .unwrap_or(error.error_message),
                ));
            }
            return Err(PlaidError::api(
                status.as_u16(),
                "UNKNOWN",
                "UNKNOWN",
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to deserialize Plaid response: {}", e);
            PlaidError::api(
                status.as_u16(),
                "PARSE",
                "PARSE_FAILED",
                format!("Failed to parse response: {}", e),
            )
        })
    }

    /// Create a Link token for the client-side linking flow.
    ///
    /// POST /link/token/create
    pub async fn create_link_token(
        &self,
        client_user_id: &str,
        client_name: &str,
    ) -> Result<LinkTokenCreateResponse> {
        let request = LinkTokenCreateRequest {
            client_name: client_name.to_string(),
            user: LinkTokenUser {
                client_user_id: client_user_id.to_string(),
            },
            products: vec!["transactions".to_string()],
            country_codes: vec!["US".to_string()],
            language: "en".to_string(),
        };
        self.post_json("/link/token/create", &request).await
    }

    /// Exchange a Link public token for a permanent access token.
    ///
    /// POST /item/public_token/exchange
    pub async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<PublicTokenExchangeResponse> {
        self.post_json(
            "/item/public_token/exchange",
            &json!({ "public_token": public_token }),
        )
        .await
    }

    /// Fetch item metadata for an access token.
    ///
    /// POST /item/get
    pub async fn get_item(&self, access_token: &str) -> Result<PlaidItem> {
        let response: ItemGetResponse = self
            .post_json("/item/get", &json!({ "access_token": access_token }))
            .await?;
        Ok(response.item)
    }

    /// Fetch institution metadata by id.
    ///
    /// POST /institutions/get_by_id
    pub async fn get_institution(&self, institution_id: &str) -> Result<PlaidInstitution> {
        let response: InstitutionsGetByIdResponse = self
            .post_json(
                "/institutions/get_by_id",
                &json!({
                    "institution_id": institution_id,
                    "country_codes": ["US"],
                }),
            )
            .await?;
        Ok(response.institution)
    }

    /// Fetch one page of the incremental transaction feed.
    ///
    /// POST /transactions/sync
    pub async fn transactions_sync_page(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsSyncResponse> {
        let mut body = json!({
            "access_token": access_token,
            "count": TRANSACTIONS_SYNC_PAGE_SIZE,
        });
        if let Some(cursor) = cursor {
            body["cursor"] = Value::String(cursor.to_string());
        }
        self.post_json("/transactions/sync", &body).await
    }

    /// Fetch current accounts and balances for an item.
    ///
    /// POST /accounts/balance/get
    pub async fn get_balances(&self, access_token: &str) -> Result<Vec<PlaidAccount>> {
        let response: AccountsGetResponse = self
            .post_json(
                "/accounts/balance/get",
                &json!({ "access_token": access_token }),
            )
            .await?;
        Ok(response.accounts)
    }

    /// Fetch investment transactions for a date window, following offset
    /// pagination to the end.
    ///
    /// POST /investments/transactions/get
    pub async fn get_investment_transactions(
        &self,
        access_token: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(Vec<PlaidSecurity>, Vec<PlaidInvestmentTransaction>)> {
        let mut securities: Vec<PlaidSecurity> = Vec::new();
        let mut transactions: Vec<PlaidInvestmentTransaction> = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let response: InvestmentsTransactionsGetResponse = self
                .post_json(
                    "/investments/transactions/get",
                    &json!({
                        "access_token": access_token,
                        "start_date": start_date.format("%Y-%m-%d").to_string(),
                        "end_date": end_date.format("%Y-%m-%d").to_string(),
                        "options": {
                            "count": INVESTMENTS_PAGE_SIZE,
                            "offset": offset,
                        },
                    }),
                )
                .await?;

            for security in response.securities {
                if !securities.iter().any(|s| s.security_id == security.security_id) {
                    securities.push(security);
                }
            }
            let page_len = response.investment_transactions.len();
            transactions.extend(response.investment_transactions);

            if page_len == 0 || (transactions.len() as i64) >= response.total_investment_transactions
            {
                break;
            }
            offset = transactions.len() as u32;
        }

        Ok((securities, transactions))
    }

    /// Fetch current holdings, used for up-to-date security close prices.
    ///
    /// POST /investments/holdings/get
    pub async fn get_holdings(&self, access_token: &str) -> Result<HoldingsGetResponse> {
        self.post_json(
            "/investments/holdings/get",
            &json!({ "access_token": access_token }),
        )
        .await
    }
}
