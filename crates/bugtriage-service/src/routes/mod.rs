//! Route table: binds each endpoint from the external HTTP contract to
//! its handler.

pub mod bugs;
pub mod health;
pub mod qa;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/bugs/", post(bugs::submit))
        .route("/api/bugs/:id", get(bugs::get_bug))
        .route("/api/bugs/:id/duplicates", get(bugs::duplicates))
        .route("/api/bugs/search", get(bugs::search))
        .route("/api/qa/bugs/:id/promote", post(qa::promote))
        .route("/api/qa/bugs/:id/reclassify", post(qa::reclassify))
        .route("/api/qa/low-quality", get(qa::list_low_quality))
        .route("/api/qa/low-quality/:id/approve", post(qa::approve_low_quality))
        .route("/api/qa/low-quality/:id/reject", post(qa::reject_low_quality))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
