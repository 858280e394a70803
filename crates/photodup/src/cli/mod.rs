//! Command implementations.

pub mod config;
pub mod count;
pub mod scan;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use photodup_core::{Config, FsPhotoStore, JobRegistry};

/// Job registry over the photo directory at `root`, or the configured
/// `store.root`.
pub fn open_registry(config: &Config, root: Option<PathBuf>) -> JobRegistry {
    let root = root.unwrap_or_else(|| config.store_root());
    tracing::debug!("Photo root: {}", root.display());
    let store = FsPhotoStore::new(root, &config.store);
    JobRegistry::from_config(Arc::new(store), config)
}
