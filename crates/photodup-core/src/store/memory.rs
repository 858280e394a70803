//! In-memory photo store, insertion-ordered.

use super::PhotoStore;
use crate::error::StoreError;
use crate::types::Photo;

/// Photo store held entirely in memory.
///
/// A photo may be registered without bytes to model content that has gone
/// missing from storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryPhotoStore {
    entries: Vec<(Photo, Option<Vec<u8>>)>,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a photo with its encoded bytes.
    pub fn insert(&mut self, photo: Photo, bytes: Vec<u8>) {
        self.entries.push((photo, Some(bytes)));
    }

    /// Add a photo whose bytes cannot be read.
    pub fn insert_missing(&mut self, photo: Photo) {
        self.entries.push((photo, None));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_photo(mut self, photo: Photo, bytes: Vec<u8>) -> Self {
        self.insert(photo, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: &str) -> Option<&Option<Vec<u8>>> {
        self.entries
            .iter()
            .find(|(photo, _)| photo.id == id)
            .map(|(_, bytes)| bytes)
    }
}

impl PhotoStore for MemoryPhotoStore {
    fn list_photos(&self, album_id: Option<&str>) -> Result<Vec<Photo>, StoreError> {
        Ok(self
            .entries
            .iter()
            .map(|(photo, _)| photo)
            .filter(|photo| album_id.is_none() || photo.album_id.as_deref() == album_id)
            .cloned()
            .collect())
    }

    fn read_bytes(&self, photo: &Photo) -> Result<Vec<u8>, StoreError> {
        match self.entry(&photo.id) {
            Some(Some(bytes)) => Ok(bytes.clone()),
            _ => Err(StoreError::NotFound(photo.id.clone())),
        }
    }

    fn exists(&self, photo: &Photo) -> bool {
        matches!(self.entry(&photo.id), Some(Some(_)))
    }
}
