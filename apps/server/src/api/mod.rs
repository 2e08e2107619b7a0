use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::main_lib::AppState;

mod health;
mod link;
mod merchants;
mod sync;
mod tags;
mod transactions;
mod webhooks;

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(link::router())
        .merge(merchants::router())
        .merge(sync::router())
        .merge(tags::router())
        .merge(transactions::router())
        .merge(webhooks::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
