//! Photodup Core - duplicate-photo detection engine.
//!
//! Finds groups of images that are the same photo (identical, cropped or
//! resized) from content alone, and runs that search as a background job
//! with pollable progress.
//!
//! # Architecture
//!
//! ```text
//! PhotoStore → FingerprintComputer → SimilarityComparator → GroupBuilder → DuplicateGroups
//!                 (phase 1, 0-30%)          (phase 2, 30-100%)
//! ```
//!
//! [`JobRegistry`] owns the lifecycle: it starts scans on a bounded worker
//! pool, serves progress snapshots, and can run a scan inline for small sets.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use photodup_core::{Config, FsPhotoStore, JobRegistry};
//!
//! let config = Config::load()?;
//! let store = FsPhotoStore::new(config.store_root(), &config.store);
//! let registry = JobRegistry::from_config(Arc::new(store), &config);
//!
//! let outcome = registry.run_sync(Some("holiday"))?;
//! for group in &outcome.groups {
//!     println!("{:?}", group.ids().collect::<Vec<_>>());
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod grouping;
pub mod scan;
pub mod similarity;
pub mod store;
pub mod types;

#[cfg(all(test, feature = "perceptual-hash"))]
mod testing;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, FingerprintError, PhotodupError, Result, ScanError, StoreError,
};
pub use fingerprint::{FingerprintComputer, FingerprintSet, ImageHash};
pub use grouping::GroupBuilder;
pub use scan::{DuplicateScanner, JobRegistry, NoProgress, ScanProgress};
pub use similarity::{MatchTier, SimilarityComparator};
pub use store::{FsPhotoStore, MemoryPhotoStore, PhotoStore};
pub use types::{
    DuplicateGroup, JobId, JobState, MediaKind, Photo, ScanOutcome, ScanStatus, ScanTicket,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
