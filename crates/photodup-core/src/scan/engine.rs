//! The two-phase duplicate scan.
//!
//! Phase 1 fingerprints every candidate. A photo whose bytes are unreadable
//! or undecodable keeps a fingerprint set with every kind failed, so it is
//! still counted and simply never matches. Phase 2 runs the grouping pass
//! over all pairs.

use std::sync::Arc;
use std::time::Instant;

use super::ScanProgress;
use crate::config::Config;
use crate::error::{FingerprintError, StoreError};
use crate::fingerprint::{FingerprintComputer, FingerprintSet};
use crate::grouping::GroupBuilder;
use crate::similarity::SimilarityComparator;
use crate::store::PhotoStore;
use crate::types::{DuplicateGroup, Photo};

/// Runs duplicate scans over photos from one store.
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct DuplicateScanner {
    store: Arc<dyn PhotoStore>,
    computer: FingerprintComputer,
    comparator: SimilarityComparator,
    grouping: GroupBuilder,
}

impl std::fmt::Debug for DuplicateScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateScanner")
            .field("computer", &self.computer)
            .field("comparator", &self.comparator)
            .field("grouping", &self.grouping)
            .finish_non_exhaustive()
    }
}

impl DuplicateScanner {
    pub fn new(store: Arc<dyn PhotoStore>, config: &Config) -> Self {
        Self {
            store,
            computer: FingerprintComputer::new(config.fingerprint.clone()),
            comparator: SimilarityComparator::new(config.similarity.clone()),
            grouping: GroupBuilder::new(&config.grouping),
        }
    }

    /// Image photos that a scan of `album_id` would consider.
    pub fn candidates(&self, album_id: Option<&str>) -> Result<Vec<Photo>, StoreError> {
        self.store.list_image_photos(album_id)
    }

    /// Fingerprint and group `photos`, reporting progress as it goes.
    ///
    /// Blocking and CPU-bound. Fewer than two photos, or a build without
    /// perceptual hashing, yields no groups.
    pub fn scan(&self, photos: Vec<Photo>, progress: &mut dyn ScanProgress) -> Vec<DuplicateGroup> {
        let total = photos.len();
        if total < 2 {
            return Vec::new();
        }

        if !FingerprintComputer::is_available() {
            tracing::warn!(
                "Perceptual hashing is not compiled in; skipping duplicate detection for {} photos",
                total
            );
            progress.fingerprinted(total, total);
            return Vec::new();
        }

        let start = Instant::now();
        let fingerprints = self.fingerprint_all(&photos, progress);
        let usable = fingerprints.iter().filter(|f| f.available_kinds() > 0).count();
        tracing::debug!(
            "Fingerprinted {} photos ({} usable) in {:?}",
            total,
            usable,
            start.elapsed()
        );

        let start = Instant::now();
        let total_pairs = GroupBuilder::total_pairs(total);
        let groups = self.grouping.build_with_progress(
            &fingerprints,
            |a, b| self.comparator.similar(a, b),
            |pairs| progress.compared(pairs, total_pairs),
        );
        tracing::debug!(
            "Compared {} pairs in {:?}, {} groups",
            total_pairs,
            start.elapsed(),
            groups.len()
        );

        groups
            .into_iter()
            .map(|members| DuplicateGroup(members.into_iter().map(|i| photos[i].clone()).collect()))
            .collect()
    }

    /// Phase 1: one fingerprint set per photo, in order.
    fn fingerprint_all(&self, photos: &[Photo], progress: &mut dyn ScanProgress) -> Vec<FingerprintSet> {
        let total = photos.len();
        photos
            .iter()
            .enumerate()
            .map(|(i, photo)| {
                let set = self.fingerprint(photo);
                progress.fingerprinted(i + 1, total);
                set
            })
            .collect()
    }

    fn fingerprint(&self, photo: &Photo) -> FingerprintSet {
        if !self.store.exists(photo) {
            tracing::warn!("Skipping {}: content is missing", photo.id);
            return FingerprintSet::unavailable(FingerprintError::NotComputed(
                "content is missing".to_string(),
            ));
        }
        // Content can still vanish between the check and the read
        let bytes = match self.store.read_bytes(photo) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", photo.id, e);
                return FingerprintSet::unavailable(FingerprintError::NotComputed(e.to_string()));
            }
        };

        let set = self
            .computer
            .compute_with_cached(&bytes, photo.global_hash.as_deref());
        for (kind, error) in set.failures() {
            tracing::debug!("No {} fingerprint for {}: {}", kind, photo.id, error);
        }
        set
    }
}
