//! Greedy seed-based duplicate grouping.
//!
//! Items are visited in the order given. Each unclaimed item becomes a seed
//! and claims every later unclaimed item that is similar *to the seed*, until
//! the group reaches `max_group_size`. Similarity is never tested between two
//! non-seed members, so a group is not a transitive closure: `a~b`, `b~c`
//! with `a!~c` groups `{a, b}` and leaves `c` to seed its own group. This is
//! an accepted approximation of single-linkage clustering.
//!
//! The size cap keeps a permissive threshold from folding a whole photo burst
//! into one group.

use crate::config::GroupingConfig;

/// Partitions an ordered item list into groups of similar items.
#[derive(Debug, Clone)]
pub struct GroupBuilder {
    max_group_size: usize,
    progress_batch: u64,
}

impl Default for GroupBuilder {
    fn default() -> Self {
        Self::new(&GroupingConfig::default())
    }
}

impl GroupBuilder {
    pub fn new(config: &GroupingConfig) -> Self {
        Self {
            max_group_size: config.max_group_size.max(2),
            progress_batch: config.progress_batch.max(1),
        }
    }

    pub fn max_group_size(&self) -> usize {
        self.max_group_size
    }

    /// Number of unordered pairs over `n` items.
    pub fn total_pairs(n: usize) -> u64 {
        let n = n as u64;
        n * n.saturating_sub(1) / 2
    }

    /// Group items, returning the member indices of every group with at
    /// least two members. Groups are disjoint; the seed comes first.
    pub fn build<T, F>(&self, items: &[T], similar: F) -> Vec<Vec<usize>>
    where
        F: FnMut(&T, &T) -> bool,
    {
        self.build_with_progress(items, similar, |_| {})
    }

    /// Like [`build`](Self::build), reporting the cumulative number of pairs
    /// accounted for every `progress_batch` pairs.
    ///
    /// Pairs skipped because a seed is already claimed, or because its group
    /// is full, are accounted for in bulk, so the last report is always
    /// exactly [`total_pairs`](Self::total_pairs).
    pub fn build_with_progress<T, F, P>(
        &self,
        items: &[T],
        mut similar: F,
        mut on_progress: P,
    ) -> Vec<Vec<usize>>
    where
        F: FnMut(&T, &T) -> bool,
        P: FnMut(u64),
    {
        let n = items.len();
        let total = Self::total_pairs(n);
        let mut claimed = vec![false; n];
        let mut groups = Vec::new();

        let mut visited = 0u64;
        let mut reported = 0u64;
        let mut advance = |visited: u64, on_progress: &mut P| {
            if visited - reported >= self.progress_batch {
                reported = visited;
                on_progress(visited);
            }
        };

        for seed in 0..n {
            let later = (n - 1 - seed) as u64;
            if claimed[seed] {
                visited += later;
                advance(visited, &mut on_progress);
                continue;
            }

            let mut group = vec![seed];
            for candidate in seed + 1..n {
                if group.len() >= self.max_group_size {
                    // The rest of this seed's pairs are never compared
                    visited += (n - candidate) as u64;
                    break;
                }
                visited += 1;
                if !claimed[candidate] && similar(&items[seed], &items[candidate]) {
                    claimed[candidate] = true;
                    group.push(candidate);
                }
                advance(visited, &mut on_progress);
            }
            advance(visited, &mut on_progress);

            if group.len() >= 2 {
                claimed[seed] = true;
                groups.push(group);
            }
        }

        debug_assert_eq!(visited, total);
        if reported != total {
            on_progress(total);
        }
        groups
    }
}
