//! Photo stores: where candidate photos and their bytes come from.
//!
//! The scan engine only reads from a store; it never mutates it.

mod fs;
mod memory;

pub use fs::FsPhotoStore;
pub use memory::MemoryPhotoStore;

use crate::error::StoreError;
use crate::types::Photo;

/// Source of photos and their encoded bytes.
///
/// Implementations must list photos in an order that is stable across
/// calls, since a scan's groups follow that order.
pub trait PhotoStore: Send + Sync {
    /// All photos, optionally restricted to one album. Unknown albums yield
    /// an empty list.
    fn list_photos(&self, album_id: Option<&str>) -> Result<Vec<Photo>, StoreError>;

    /// Encoded bytes of a photo, or `NotFound`.
    fn read_bytes(&self, photo: &Photo) -> Result<Vec<u8>, StoreError>;

    /// Whether the photo's content is present.
    fn exists(&self, photo: &Photo) -> bool;

    /// Scan candidates: image photos only, in listing order.
    fn list_image_photos(&self, album_id: Option<&str>) -> Result<Vec<Photo>, StoreError> {
        let mut photos = self.list_photos(album_id)?;
        photos.retain(Photo::is_image);
        Ok(photos)
    }
}
