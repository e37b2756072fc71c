mod handlers;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::StateHandle;

pub fn create_router(state: StateHandle) -> Router {
    Router::new()
        .route("/api/state", get(handlers::get_state))
        .route("/api/search", get(handlers::search))
        .route("/api/document", get(handlers::get_document))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
