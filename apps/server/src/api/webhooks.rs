use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
pub struct PlaidWebhook {
    #[serde(default)]
    pub webhook_type: String,
    #[serde(default)]
    pub webhook_code: String,
    #[serde(default)]
    pub item_id: String,
}

fn wants_sync(payload: &PlaidWebhook) -> bool {
    payload.webhook_type == "TRANSACTIONS"
        && payload.webhook_code == "SYNC_UPDATES_AVAILABLE"
        && !payload.item_id.is_empty()
}

/// Aggregator webhook receiver. Only transaction sync-update notifications
/// trigger work; every other code is acknowledged and dropped.
async fn plaid_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<PlaidWebhook>,
) -> ApiResult<Json<Value>> {
    // When the toggle is on, only the presence of the verification header is
    // checked; JWT validation of the payload is not performed.
    if state.config.verify_webhooks && !headers.contains_key("plaid-verification") {
        return Err(crate::error::ApiError::BadRequest(
            "missing plaid-verification header".into(),
        ));
    }

    if !wants_sync(&payload) {
        info!(
            "Ignoring webhook {}/{}",
            payload.webhook_type, payload.webhook_code
        );
        return Ok(Json(json!({ "success": true })));
    }

    let counts = state.sync_service.sync_item(&payload.item_id).await?;
    Ok(Json(json!({
        "success": true,
        "added": counts.added,
        "modified": counts.modified,
        "removed": counts.removed,
    })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/webhooks/plaid", post(plaid_webhook))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook(kind: &str, code: &str, item: &str) -> PlaidWebhook {
        PlaidWebhook {
            webhook_type: kind.to_string(),
            webhook_code: code.to_string(),
            item_id: item.to_string(),
        }
    }

    #[test]
    fn only_sync_updates_trigger_work() {
        assert!(wants_sync(&webhook(
            "TRANSACTIONS",
            "SYNC_UPDATES_AVAILABLE",
            "item-1"
        )));
        assert!(!wants_sync(&webhook(
            "TRANSACTIONS",
            "INITIAL_UPDATE",
            "item-1"
        )));
        assert!(!wants_sync(&webhook("ITEM", "ERROR", "item-1")));
        assert!(!wants_sync(&webhook(
            "TRANSACTIONS",
            "SYNC_UPDATES_AVAILABLE",
            ""
        )));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let payload: PlaidWebhook = serde_json::from_str("{}").unwrap();
        assert!(!wants_sync(&payload));
    }
}
