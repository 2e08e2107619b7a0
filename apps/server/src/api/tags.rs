use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use pocketledger_core::categories::{Category, CategoryRepositoryTrait};
use pocketledger_core::tags::{NewTag, Tag, TagRepositoryTrait};

async fn list_tags(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.tag_repo.list()?))
}

async fn create_tag(
    State(state): State<Arc<AppState>>,
    Json(tag): Json<NewTag>,
) -> ApiResult<Json<Tag>> {
    if tag.name.trim().is_empty() {
        return Err(ApiError::BadRequest("tag name is required".into()));
    }
    Ok(Json(state.tag_repo.create(tag).await?))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.category_repo.list()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/categories", get(list_categories))
}
