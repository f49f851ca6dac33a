//! REST surface

pub mod handlers;
pub mod response;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::services::AppContext;

/// Build the API router over a shared application context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/ipos", get(handlers::list_ipos))
        .route("/api/ipos/{symbol}", get(handlers::get_ipo))
        .route("/api/gmp", get(handlers::gmp))
        .route("/api/gmp/trending", get(handlers::gmp_trending))
        .route("/api/gmp/{identifier}", get(handlers::gmp_by_identifier))
        .route("/api/subscriptions", get(handlers::subscriptions))
        .route("/api/stats", get(handlers::stats))
        .route("/api/search", get(handlers::search))
        .route("/api/admin/ipo", post(handlers::create_ipo))
        .route("/api/health", get(handlers::health))
        .with_state(ctx)
}
