//! Health check handler.

use axum::{extract::State, Json};
use photodup_core::FingerprintComputer;
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when perceptual hashing is not compiled in
    pub status: &'static str,
    /// Server version from Cargo.toml
    pub version: &'static str,
    /// Whether scans can find duplicates at all
    pub hashing_available: bool,
    /// Scan jobs pending or running
    pub active_jobs: usize,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let hashing_available = FingerprintComputer::is_available();
    Json(HealthResponse {
        status: if hashing_available { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        hashing_available,
        active_jobs: state.registry.active_jobs(),
    })
}
