//! Photo collection queries.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use super::AlbumQuery;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Image photos a scan would consider
    pub count: usize,
}

/// GET /photos/count?album_id=
pub async fn photo_count(
    State(state): State<AppState>,
    Query(query): Query<AlbumQuery>,
) -> Result<Json<CountResponse>, ApiError> {
    let album = query.album().map(str::to_owned);
    let registry = state.registry.clone();
    let count = tokio::task::spawn_blocking(move || registry.photo_count(album.as_deref()))
        .await
        .map_err(|e| ApiError::internal(format!("count task failed: {e}")))??;
    Ok(Json(CountResponse { count }))
}
