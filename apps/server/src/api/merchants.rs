use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use pocketledger_core::categories::CategoryRepositoryTrait;
use pocketledger_core::merchants::{
    Merchant, MerchantDefaultsUpdate, MerchantRepositoryTrait, NewMerchant,
};
use pocketledger_core::tags::TagRepositoryTrait;
use pocketledger_core::transactions::TransactionRepositoryTrait;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub merchant_name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tag_id: Option<String>,
    /// Legacy clients send the tag under this key.
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub update_existing: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateResponse {
    pub success: bool,
    pub merchant: Merchant,
    pub transactions_updated: usize,
}

pub struct MerchantDeps {
    pub merchant_repo: Arc<dyn MerchantRepositoryTrait>,
    pub category_repo: Arc<dyn CategoryRepositoryTrait>,
    pub tag_repo: Arc<dyn TagRepositoryTrait>,
    pub transaction_repo: Arc<dyn TransactionRepositoryTrait>,
}

pub async fn apply_bulk_update(
    deps: &MerchantDeps,
    request: BulkUpdateRequest,
) -> ApiResult<BulkUpdateResponse> {
    let name = request.merchant_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("merchant_name is required".into()));
    }

    let tag_id = request.tag_id.or(request.entity_id);

    if let Some(category) = &request.category_id {
        if deps.category_repo.get_by_id(category)?.is_none() {
            return Err(ApiError::BadRequest(format!(
                "unknown category: {category}"
            )));
        }
    }
    if let Some(tag) = &tag_id {
        if deps.tag_repo.get_by_id(tag)?.is_none() {
            return Err(ApiError::BadRequest(format!("unknown tag: {tag}")));
        }
    }

    let merchant = match deps.merchant_repo.find_by_name(name)? {
        Some(existing) => existing,
        None => {
            deps.merchant_repo
                .create(NewMerchant {
                    name: name.to_string(),
                    entity_id: None,
                    default_category_id: None,
                    default_tag_id: None,
                    confirmed: false,
                    confidence: None,
                    logo_url: None,
                })
                .await?
        }
    };

    // Fields absent from the request keep their stored defaults.
    let merchant = deps
        .merchant_repo
        .update_defaults(MerchantDefaultsUpdate {
            merchant_id: merchant.id.clone(),
            default_category_id: request
                .category_id
                .clone()
                .or(merchant.default_category_id.clone()),
            default_tag_id: tag_id.clone().or(merchant.default_tag_id.clone()),
            confirmed: Some(true),
        })
        .await?;

    let transactions_updated = if request.update_existing {
        deps.transaction_repo
            .backfill_merchant_defaults(merchant.name.clone(), request.category_id, tag_id)
            .await?
    } else {
        0
    };

    info!(
        "Merchant '{}' defaults updated, {} transactions backfilled",
        merchant.name, transactions_updated
    );

    Ok(BulkUpdateResponse {
        success: true,
        merchant,
        transactions_updated,
    })
}

async fn bulk_update(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BulkUpdateRequest>,
) -> ApiResult<Json<BulkUpdateResponse>> {
    let deps = MerchantDeps {
        merchant_repo: state.merchant_repo.clone(),
        category_repo: state.category_repo.clone(),
        tag_repo: state.tag_repo.clone(),
        transaction_repo: state.transaction_repo.clone(),
    };
    let response = apply_bulk_update(&deps, request).await?;
    Ok(Json(response))
}

async fn list_merchants(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Merchant>>> {
    Ok(Json(state.merchant_repo.list()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/merchants", get(list_merchants))
        .route("/merchants/bulk-update", post(bulk_update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use pocketledger_core::categories::NewCategory;
    use pocketledger_core::tags::NewTag;
    use pocketledger_storage_sqlite::{
        create_pool, init, run_migrations, spawn_writer, CategoryRepository, MerchantRepository,
        TagRepository, TransactionRepository,
    };

    fn setup_deps() -> MerchantDeps {
        let app_data = tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        let pool = create_pool(&db_path).expect("create pool");
        run_migrations(&pool).expect("migrate db");
        let writer = spawn_writer(pool.as_ref().clone());

        MerchantDeps {
            merchant_repo: Arc::new(MerchantRepository::new(pool.clone(), writer.clone())),
            category_repo: Arc::new(CategoryRepository::new(pool.clone(), writer.clone())),
            tag_repo: Arc::new(TagRepository::new(pool.clone(), writer.clone())),
            transaction_repo: Arc::new(TransactionRepository::new(pool, writer)),
        }
    }

    #[tokio::test]
    async fn bulk_update_creates_the_merchant_when_absent() {
        let deps = setup_deps();

        let response = apply_bulk_update(
            &deps,
            BulkUpdateRequest {
                merchant_name: "Acme Coffee".to_string(),
                category_id: None,
                tag_id: None,
                entity_id: None,
                update_existing: false,
            },
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(response.merchant.name, "Acme Coffee");
        assert!(response.merchant.confirmed);
        assert_eq!(response.transactions_updated, 0);
    }

    #[tokio::test]
    async fn legacy_entity_id_lands_as_the_default_tag() {
        let deps = setup_deps();
        let tag = deps
            .tag_repo
            .create(NewTag {
                name: "Subscriptions".to_string(),
                color: None,
            })
            .await
            .unwrap();

        let response = apply_bulk_update(
            &deps,
            BulkUpdateRequest {
                merchant_name: "Netflix".to_string(),
                category_id: None,
                tag_id: None,
                entity_id: Some(tag.id.clone()),
                update_existing: false,
            },
        )
        .await
        .unwrap();

        assert_eq!(response.merchant.default_tag_id.as_deref(), Some(tag.id.as_str()));
    }

    #[tokio::test]
    async fn omitted_fields_keep_their_stored_defaults() {
        let deps = setup_deps();
        let tag = deps
            .tag_repo
            .create(NewTag {
                name: "Coffee Money".to_string(),
                color: None,
            })
            .await
            .unwrap();
        let category = deps
            .category_repo
            .create(NewCategory {
                name: "Restaurants".to_string(),
                parent_id: None,
                plaid_detailed_category: None,
            })
            .await
            .unwrap();

        apply_bulk_update(
            &deps,
            BulkUpdateRequest {
                merchant_name: "Acme Coffee".to_string(),
                category_id: None,
                tag_id: Some(tag.id.clone()),
                entity_id: None,
                update_existing: false,
            },
        )
        .await
        .unwrap();

        let response = apply_bulk_update(
            &deps,
            BulkUpdateRequest {
                merchant_name: "Acme Coffee".to_string(),
                category_id: Some(category.id.clone()),
                tag_id: None,
                entity_id: None,
                update_existing: false,
            },
        )
        .await
        .unwrap();

        assert_eq!(
            response.merchant.default_category_id.as_deref(),
            Some(category.id.as_str())
        );
        assert_eq!(
            response.merchant.default_tag_id.as_deref(),
            Some(tag.id.as_str())
        );
    }

    #[tokio::test]
    async fn unknown_tag_is_rejected_up_front() {
        let deps = setup_deps();

        let result = apply_bulk_update(
            &deps,
            BulkUpdateRequest {
                merchant_name: "Acme Coffee".to_string(),
                category_id: None,
                tag_id: Some("no-such-tag".to_string()),
                entity_id: None,
                update_existing: true,
            },
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn blank_merchant_name_is_rejected() {
        let deps = setup_deps();

        let result = apply_bulk_update(
            &deps,
            BulkUpdateRequest {
                merchant_name: "   ".to_string(),
                category_id: None,
                tag_id: None,
                entity_id: None,
                update_existing: false,
            },
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
