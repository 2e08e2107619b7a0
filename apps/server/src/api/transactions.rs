use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};
use pocketledger_core::transactions::{Transaction, TransactionRepositoryTrait};

const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    limit: Option<i64>,
}

/// Recent transactions for one account, newest first.
async fn list_for_account(
    Path(account_id): Path<String>,
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 1000);
    let rows = state.transaction_repo.list_by_account(&account_id, limit)?;
    Ok(Json(rows))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/accounts/{account_id}/transactions",
        get(list_for_account),
    )
}
