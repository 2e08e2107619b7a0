use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ApiResult, main_lib::AppState};
use pocketledger_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use pocketledger_core::sync::ProviderAccount;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkTokenRequest {
    #[serde(default)]
    client_user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkTokenResponse {
    link_token: String,
    expiration: Option<String>,
}

/// Create a link token for the client-side linking flow.
async fn create_link_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LinkTokenRequest>,
) -> ApiResult<Json<LinkTokenResponse>> {
    let user_id = request
        .client_user_id
        .unwrap_or_else(|| "pocketledger-user".to_string());
    let response = state
        .plaid
        .create_link_token(&user_id, &state.config.link_client_name)
        .await?;
    Ok(Json(LinkTokenResponse {
        link_token: response.link_token,
        expiration: response.expiration,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRequest {
    public_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeResponse {
    success: bool,
    item_id: String,
    institution_name: Option<String>,
    accounts: Vec<Account>,
}

/// Exchange a public token after linking: persists the access token and
/// creates a local row for every account the institution reports.
async fn exchange_public_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExchangeRequest>,
) -> ApiResult<Json<ExchangeResponse>> {
    let exchange = state
        .plaid
        .exchange_public_token(&request.public_token)
        .await?;

    let item = state.plaid.get_item(&exchange.access_token).await?;
    let institution_name = match &item.institution_id {
        Some(institution_id) => Some(state.plaid.get_institution(institution_id).await?.name),
        None => None,
    };

    let provider_accounts: Vec<ProviderAccount> = state
        .plaid
        .get_balances(&exchange.access_token)
        .await?
        .into_iter()
        .map(ProviderAccount::from)
        .collect();

    let mut accounts = Vec::with_capacity(provider_accounts.len());
    for provider in provider_accounts {
        let account = state
            .account_repo
            .create(NewAccount {
                id: None,
                item_id: exchange.item_id.clone(),
                plaid_account_id: Some(provider.account_id),
                access_token: exchange.access_token.clone(),
                institution_name: institution_name.clone(),
                name: provider
                    .name
                    .or(provider.official_name)
                    .unwrap_or_else(|| "Account".to_string()),
                account_type: provider
                    .account_type
                    .unwrap_or_else(|| "depository".to_string()),
                subtype: provider.subtype,
                currency: provider.currency.unwrap_or_else(|| "USD".to_string()),
                current_balance: provider.current_balance,
                available_balance: provider.available_balance,
            })
            .await?;
        accounts.push(account);
    }

    info!(
        "Linked item {} ({} accounts)",
        exchange.item_id,
        accounts.len()
    );

    Ok(Json(ExchangeResponse {
        success: true,
        item_id: exchange.item_id,
        institution_name,
        accounts,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/link/token", post(create_link_token))
        .route("/link/exchange", post(exchange_public_token))
}
