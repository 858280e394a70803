//! Progress record of one scan job.
//!
//! Progress is split into two weighted phases: fingerprinting covers 0-30%
//! and pairwise comparison 30-99%. Only completion reports 100%. Percent
//! never decreases, and once the job is terminal every mutator is a no-op.

use std::time::Instant;

use super::ScanProgress;
use crate::types::{DuplicateGroup, JobId, JobState, ScanStatus};

/// Share of the progress bar owned by the fingerprinting phase.
const FINGERPRINT_WEIGHT: u64 = 30;
/// Highest percent reported before the job is done.
const MAX_RUNNING_PERCENT: u64 = 99;

/// Percent after `scanned` of `total` photos were fingerprinted.
pub(crate) fn fingerprint_percent(scanned: usize, total: usize) -> u8 {
    if total == 0 {
        return FINGERPRINT_WEIGHT as u8;
    }
    (scanned as u64 * FINGERPRINT_WEIGHT / total as u64).min(FINGERPRINT_WEIGHT) as u8
}

/// Percent after `pairs` of `total_pairs` comparisons.
pub(crate) fn compare_percent(pairs: u64, total_pairs: u64) -> u8 {
    let span = 100 - FINGERPRINT_WEIGHT;
    let done = match total_pairs {
        0 => 0,
        _ => pairs.min(total_pairs) * span / total_pairs,
    };
    (FINGERPRINT_WEIGHT + done).min(MAX_RUNNING_PERCENT) as u8
}

#[derive(Debug)]
pub(crate) struct ScanJob {
    id: JobId,
    state: JobState,
    total: usize,
    scanned: usize,
    percent: u8,
    groups: Vec<DuplicateGroup>,
    error: Option<String>,
    finished_at: Option<Instant>,
}

impl ScanJob {
    pub(crate) fn new(id: JobId, total: usize) -> Self {
        Self {
            id,
            state: JobState::Pending,
            total,
            scanned: 0,
            percent: 0,
            groups: Vec::new(),
            error: None,
            finished_at: None,
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// When the job became terminal.
    pub(crate) fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub(crate) fn mark_running(&mut self) {
        if self.state == JobState::Pending {
            self.state = JobState::Running;
        }
    }

    /// Terminal success. Every candidate counts as scanned.
    ///
    /// Jobs finish from `running`; callers mark them running first.
    pub(crate) fn complete(&mut self, groups: Vec<DuplicateGroup>) {
        if self.is_terminal() {
            return;
        }
        debug_assert_eq!(self.state, JobState::Running, "job {} finished before running", self.id);
        self.state = JobState::Done;
        self.scanned = self.total;
        self.percent = 100;
        self.groups = groups;
        self.finished_at = Some(Instant::now());
    }

    /// Terminal failure. Progress counters are left where they were.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        debug_assert_eq!(self.state, JobState::Running, "job {} failed before running", self.id);
        self.state = JobState::Error;
        self.error = Some(message.into());
        self.finished_at = Some(Instant::now());
    }

    pub(crate) fn snapshot(&self) -> ScanStatus {
        ScanStatus {
            job_id: self.id.clone(),
            state: self.state,
            scanned: self.scanned,
            total: self.total,
            percent: self.percent,
            done: self.is_terminal(),
            groups: self.groups.clone(),
            error: self.error.clone(),
        }
    }

    /// Consume a terminal record into its groups and scanned count.
    pub(crate) fn into_parts(self) -> (Vec<DuplicateGroup>, usize) {
        (self.groups, self.scanned)
    }

    fn raise_percent(&mut self, percent: u8) {
        self.percent = self.percent.max(percent);
    }
}

impl ScanProgress for ScanJob {
    fn fingerprinted(&mut self, scanned: usize, total: usize) {
        if self.is_terminal() {
            return;
        }
        self.scanned = self.scanned.max(scanned);
        self.raise_percent(fingerprint_percent(scanned, total));
    }

    fn compared(&mut self, pairs: u64, total_pairs: u64) {
        if self.is_terminal() {
            return;
        }
        self.raise_percent(compare_percent(pairs, total_pairs));
    }
}
