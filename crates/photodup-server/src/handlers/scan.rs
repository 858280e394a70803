//! Duplicate scan handlers.
//!
//! `POST /photos/duplicates/scan` starts a background job and returns at
//! once; `GET /photos/duplicates/scan/{job_id}` polls it. The `scan-sync`
//! variant blocks until the result is ready and is only sensible for small
//! candidate sets.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use photodup_core::{JobId, ScanOutcome, ScanStatus, ScanTicket};

use super::AlbumQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /photos/duplicates/scan?album_id=
pub async fn start_scan(
    State(state): State<AppState>,
    Query(query): Query<AlbumQuery>,
) -> Result<Json<ScanTicket>, ApiError> {
    let ticket = state.registry.start(query.album()).await?;
    Ok(Json(ticket))
}

/// GET /photos/duplicates/scan/{job_id}
pub async fn scan_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ScanStatus>, ApiError> {
    let status = state.registry.poll(&JobId::from(job_id))?;
    Ok(Json(status))
}

/// POST /photos/duplicates/scan-sync?album_id=
pub async fn scan_sync(
    State(state): State<AppState>,
    Query(query): Query<AlbumQuery>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let album = query.album().map(str::to_owned);
    let registry = state.registry.clone();
    let outcome = tokio::task::spawn_blocking(move || registry.run_sync(album.as_deref()))
        .await
        .map_err(|e| ApiError::internal(format!("scan task failed: {e}")))??;
    Ok(Json(outcome))
}
