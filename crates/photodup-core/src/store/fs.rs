//! Directory-backed photo store.
//!
//! Layout:
//! ```text
//! root/
//!   loose.jpg          -> no album
//!   holiday/           -> album "holiday"
//!     beach.jpg
//!     day2/sunset.png  -> album "holiday"
//! ```

use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::PhotoStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::types::{MediaKind, Photo};

/// Photo store over a directory tree. First-level subdirectories are albums.
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
    root: PathBuf,
    image_extensions: Vec<String>,
    video_extensions: Vec<String>,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>, config: &StoreConfig) -> Self {
        let lower = |exts: &[String]| exts.iter().map(|e| e.to_lowercase()).collect();
        Self {
            root: root.into(),
            image_extensions: lower(&config.image_extensions),
            video_extensions: lower(&config.video_extensions),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Media kind for a path, or `None` if the extension is not media.
    fn media_kind(&self, path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if self.image_extensions.contains(&ext) {
            Some(MediaKind::Image)
        } else if self.video_extensions.contains(&ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Resolve a photo id to a path under the root, refusing ids that could
    /// escape it.
    fn resolve(&self, id: &str) -> Option<PathBuf> {
        let relative = Path::new(id);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (contained && !id.is_empty()).then(|| self.root.join(relative))
    }

    fn photo_for(&self, path: &Path) -> Option<Photo> {
        let media_kind = self.media_kind(path)?;
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        let (filename, dirs) = parts.split_last()?;

        Some(Photo {
            id: parts.join("/"),
            filename: (*filename).to_string(),
            media_kind,
            album_id: dirs.first().map(|album| (*album).to_string()),
            global_hash: None,
        })
    }
}

impl PhotoStore for FsPhotoStore {
    fn list_photos(&self, album_id: Option<&str>) -> Result<Vec<Photo>, StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::Io {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "photo root is not a directory",
                ),
            });
        }

        let start = match album_id {
            Some(album) => match self.resolve(album) {
                Some(dir) if Path::new(album).components().count() == 1 && dir.is_dir() => dir,
                _ => {
                    tracing::debug!("Unknown album {:?}", album);
                    return Ok(Vec::new());
                }
            },
            None => self.root.clone(),
        };

        let mut photos: Vec<Photo> = WalkDir::new(&start)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| self.photo_for(e.path()))
            .collect();

        photos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(photos)
    }

    fn read_bytes(&self, photo: &Photo) -> Result<Vec<u8>, StoreError> {
        let path = self
            .resolve(&photo.id)
            .ok_or_else(|| StoreError::NotFound(photo.id.clone()))?;
        std::fs::read(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(photo.id.clone()),
            _ => StoreError::Io { path, source },
        })
    }

    fn exists(&self, photo: &Photo) -> bool {
        self.resolve(&photo.id).is_some_and(|p| p.is_file())
    }
}
