use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};
use pocketledger_core::accounts::{Account, AccountRepositoryTrait};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncResponse {
    success: bool,
    message: String,
    synced: usize,
    added: usize,
    modified: usize,
    removed: usize,
    total_in_database: i64,
}

/// Manual full resync: wipes stored transactions and replays history for
/// every active account.
async fn run_sync(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncResponse>> {
    let summary = state.sync_service.full_resync().await?;
    Ok(Json(SyncResponse {
        success: true,
        message: format!("Synced {} accounts", summary.accounts_synced),
        synced: summary.accounts_synced,
        added: summary.added,
        modified: summary.modified,
        removed: summary.removed,
        total_in_database: summary.total_in_database,
    }))
}

/// Accounts with their cursors and per-item sync status. Access tokens are
/// never serialized.
async fn sync_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Account>>> {
    let accounts = state.account_repo.list(None)?;
    Ok(Json(accounts))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync", post(run_sync))
        .route("/sync/status", get(sync_status))
}
