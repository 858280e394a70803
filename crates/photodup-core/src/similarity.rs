//! "Same photo" decision over two fingerprint sets.
//!
//! Three tiers are OR-ed, cheapest and strictest first. A tier is skipped
//! when either side lacks the fingerprint it needs.
//!
//! 1. **Global**: whole-image hash distance within `global_max_distance`.
//! 2. **Segments**: greedy one-to-one pairing of segment hashes; enough of
//!    the smaller set must find a partner within `segment_max_distance`.
//! 3. **Resize**: normalized-resolution hash distance within
//!    `resize_max_distance`.

use serde::{Deserialize, Serialize};

use crate::config::SimilarityConfig;
use crate::fingerprint::{FingerprintSet, ImageHash};

/// Which tier recognized a pair as the same photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Global,
    Segments,
    Resize,
}

/// Symmetric similarity test over [`FingerprintSet`]s.
#[derive(Debug, Clone, Default)]
pub struct SimilarityComparator {
    config: SimilarityConfig,
}

impl SimilarityComparator {
    pub fn new(config: SimilarityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Whether two photos are the same picture.
    pub fn similar(&self, a: &FingerprintSet, b: &FingerprintSet) -> bool {
        self.match_tier(a, b).is_some()
    }

    /// The first tier that matches, or `None`.
    pub fn match_tier(&self, a: &FingerprintSet, b: &FingerprintSet) -> Option<MatchTier> {
        if let (Ok(ga), Ok(gb)) = (&a.global, &b.global) {
            if within(ga, gb, self.config.global_max_distance) {
                return Some(MatchTier::Global);
            }
        }

        if let (Ok(sa), Ok(sb)) = (&a.segments, &b.segments) {
            if self.segments_match(sa, sb) {
                return Some(MatchTier::Segments);
            }
        }

        if let (Ok(ra), Ok(rb)) = (&a.resize, &b.resize) {
            if within(ra, rb, self.config.resize_max_distance) {
                return Some(MatchTier::Resize);
            }
        }

        None
    }

    /// Crop-tier decision for two segment sets.
    pub fn segments_match(&self, a: &[ImageHash], b: &[ImageHash]) -> bool {
        let (smaller, _) = canonical_order(a, b);
        if smaller.is_empty() {
            return false;
        }
        let required = required_matches(smaller.len(), self.config.segment_match_fraction);
        self.matched_segments(a, b) >= required
    }

    /// Number of segments of the smaller set that found a distinct partner.
    ///
    /// Each segment of the smaller set takes the closest unused segment of
    /// the larger set (first one on ties); the pair counts if it is within
    /// `segment_max_distance`, and the partner is then used up.
    pub fn matched_segments(&self, a: &[ImageHash], b: &[ImageHash]) -> usize {
        let (smaller, larger) = canonical_order(a, b);
        let mut used = vec![false; larger.len()];
        let mut matched = 0;

        for hash in smaller {
            let closest = larger
                .iter()
                .enumerate()
                .filter(|(j, _)| !used[*j])
                .filter_map(|(j, other)| hash.distance(other).map(|d| (d, j)))
                .min();

            if let Some((distance, j)) = closest {
                if distance <= self.config.segment_max_distance {
                    used[j] = true;
                    matched += 1;
                }
            }
        }
        matched
    }
}

fn within(a: &ImageHash, b: &ImageHash, max_distance: u32) -> bool {
    a.distance(b).is_some_and(|d| d <= max_distance)
}

/// `max(1, ceil(fraction * smaller_len))`.
fn required_matches(smaller_len: usize, fraction: f32) -> usize {
    ((fraction as f64 * smaller_len as f64).ceil() as usize).max(1)
}

/// Order two segment sets as (smaller, larger). Equal sizes are ordered by
/// content so the greedy pass runs the same way for either argument order.
fn canonical_order<'a>(
    a: &'a [ImageHash],
    b: &'a [ImageHash],
) -> (&'a [ImageHash], &'a [ImageHash]) {
    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => (a, b),
        std::cmp::Ordering::Greater => (b, a),
        std::cmp::Ordering::Equal if a <= b => (a, b),
        std::cmp::Ordering::Equal => (b, a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FingerprintError;

    /// 64-bit hash with the given bit positions set.
    fn hash(ones: &[u32]) -> ImageHash {
        ImageHash::from_bits((0..64).map(|i| ones.contains(&i)))
    }

    /// 64-bit hash whose first `n` bits are set.
    fn prefix(n: u32) -> ImageHash {
        ImageHash::from_bits((0..64).map(|i| i < n))
    }

    fn set(
        global: Option<ImageHash>,
        segments: Option<Vec<ImageHash>>,
        resize: Option<ImageHash>,
    ) -> FingerprintSet {
        let missing = || FingerprintError::NotComputed("test".into());
        FingerprintSet {
            global: global.ok_or_else(missing),
            segments: segments.ok_or_else(missing),
            resize: resize.ok_or_else(missing),
        }
    }

    #[test]
    fn test_global_tier_threshold() {
        let cmp = SimilarityComparator::default();
        let a = set(Some(prefix(0)), None, None);
        let near = set(Some(prefix(5)), None, None);
        let far = set(Some(prefix(6)), None, None);
        assert_eq!(cmp.match_tier(&a, &near), Some(MatchTier::Global));
        assert_eq!(cmp.match_tier(&a, &far), None);
    }

    #[test]
    fn test_resize_tier_threshold() {
        let cmp = SimilarityComparator::default();
        let a = set(None, None, Some(prefix(0)));
        let near = set(None, None, Some(prefix(10)));
        let far = set(None, None, Some(prefix(11)));
        assert_eq!(cmp.match_tier(&a, &near), Some(MatchTier::Resize));
        assert_eq!(cmp.match_tier(&a, &far), None);
    }

    #[test]
    fn test_missing_fingerprints_cannot_vote() {
        let cmp = SimilarityComparator::default();
        let a = set(Some(prefix(0)), None, None);
        let b = set(None, None, Some(prefix(0)));
        assert!(!cmp.similar(&a, &b));
        let nothing = FingerprintSet::unavailable(FingerprintError::Unavailable);
        assert!(!cmp.similar(&nothing, &nothing));
    }

    #[test]
    fn test_tiers_short_circuit_in_order() {
        let cmp = SimilarityComparator::default();
        let a = set(Some(prefix(0)), Some(vec![prefix(0)]), Some(prefix(0)));
        assert_eq!(cmp.match_tier(&a, &a), Some(MatchTier::Global));

        let b = set(Some(prefix(30)), Some(vec![prefix(0)]), Some(prefix(0)));
        assert_eq!(cmp.match_tier(&a, &b), Some(MatchTier::Segments));

        let c = set(Some(prefix(30)), Some(vec![prefix(40)]), Some(prefix(2)));
        assert_eq!(cmp.match_tier(&a, &c), Some(MatchTier::Resize));
    }

    #[test]
    fn test_segment_partner_is_used_once() {
        let cmp = SimilarityComparator::default();
        // Two identical small-set segments, one candidate partner
        let small = vec![prefix(0), prefix(0)];
        let large = vec![prefix(0), prefix(40), prefix(50)];
        assert_eq!(cmp.matched_segments(&small, &large), 1);
        assert_eq!(cmp.matched_segments(&large, &small), 1);
    }

    #[test]
    fn test_segment_greedy_takes_closest() {
        let cmp = SimilarityComparator::default();
        let small = vec![prefix(3)];
        let large = vec![prefix(9), prefix(4), prefix(0)];
        assert_eq!(cmp.matched_segments(&small, &large), 1);
    }

    #[test]
    fn test_segment_coverage_fraction() {
        let cmp = SimilarityComparator::default();
        // 17 bits spread across the word, far from every prefix hash
        let unrelated = |i: u32| {
            let mut ones = vec![i, i + 10, i + 20];
            ones.extend(i + 30..i + 44);
            hash(&ones)
        };

        // 4 of 5 segments shared: ceil(0.5 * 5) = 3 required
        let a = vec![prefix(0), prefix(20), prefix(40), prefix(60), unrelated(1)];
        let b = vec![prefix(0), prefix(20), prefix(40), prefix(60), prefix(10)];
        assert!(cmp.segments_match(&a, &b));

        // 2 of 5 shared
        let c = vec![prefix(0), prefix(20), unrelated(2), unrelated(3), unrelated(4)];
        let d = vec![prefix(0), prefix(20), prefix(10), prefix(30), prefix(50)];
        assert_eq!(cmp.matched_segments(&c, &d), 2);
        assert!(!cmp.segments_match(&c, &d));

        let lenient = SimilarityComparator::new(SimilarityConfig {
            segment_match_fraction: 0.15,
            ..SimilarityConfig::default()
        });
        assert!(lenient.segments_match(&c, &d));
    }

    #[test]
    fn test_required_matches_has_floor_of_one() {
        assert_eq!(required_matches(1, 0.15), 1);
        assert_eq!(required_matches(3, 0.15), 1);
        assert_eq!(required_matches(7, 0.15), 2);
        assert_eq!(required_matches(5, 0.5), 3);
        assert_eq!(required_matches(4, 0.5), 2);
    }

    #[test]
    fn test_empty_segment_set_never_matches() {
        let cmp = SimilarityComparator::default();
        assert!(!cmp.segments_match(&[], &[prefix(0)]));
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let cmp = SimilarityComparator::default();
        // Equal-sized sets where greedy order matters
        let a = vec![prefix(8), prefix(0)];
        let b = vec![prefix(4), prefix(20)];
        assert_eq!(cmp.matched_segments(&a, &b), cmp.matched_segments(&b, &a));

        let sets = [
            set(Some(prefix(0)), Some(a.clone()), Some(prefix(3))),
            set(Some(prefix(9)), Some(b.clone()), None),
            set(None, Some(vec![prefix(5)]), Some(prefix(14))),
            set(Some(prefix(4)), None, Some(prefix(30))),
            FingerprintSet::unavailable(FingerprintError::Unavailable),
        ];
        for x in &sets {
            for y in &sets {
                assert_eq!(cmp.similar(x, y), cmp.similar(y, x));
                assert_eq!(cmp.match_tier(x, y), cmp.match_tier(y, x));
            }
        }
    }
}
