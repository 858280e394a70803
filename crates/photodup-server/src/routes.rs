//! Router configuration: routes and middleware layers.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, photo_count, scan_status, scan_sync, start_scan};
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/photos/duplicates/scan", post(start_scan))
        .route("/photos/duplicates/scan/{job_id}", get(scan_status))
        .route("/photos/duplicates/scan-sync", post(scan_sync))
        .route("/photos/count", get(photo_count))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
