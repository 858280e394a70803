//! HTTP request handlers.

pub mod health;
pub mod photos;
pub mod scan;

pub use health::{health, HealthResponse};
pub use photos::{photo_count, CountResponse};
pub use scan::{scan_status, scan_sync, start_scan};

use serde::Deserialize;

/// `?album_id=` query shared by the scan and count endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AlbumQuery {
    #[serde(default)]
    pub album_id: Option<String>,
}

impl AlbumQuery {
    /// The album filter; an empty value means "all albums".
    pub fn album(&self) -> Option<&str> {
        self.album_id.as_deref().filter(|a| !a.is_empty())
    }
}
