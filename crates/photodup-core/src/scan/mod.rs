//! Scan jobs: the duplicate scanner and the registry that runs it.
//!
//! ```text
//! start(album) ──► JobRegistry ──► worker pool ──► DuplicateScanner
//!                      ▲                               │ progress
//! poll(job_id) ────────┘◄──────── ScanJob record ◄─────┘
//! ```

mod engine;
mod job;
mod registry;

pub use engine::DuplicateScanner;
pub use registry::JobRegistry;

/// Receives progress from a running scan.
pub trait ScanProgress {
    /// `scanned` of `total` photos have been fingerprinted.
    fn fingerprinted(&mut self, scanned: usize, total: usize);

    /// `pairs` of `total_pairs` pairs have been accounted for.
    fn compared(&mut self, pairs: u64, total_pairs: u64);
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn fingerprinted(&mut self, _scanned: usize, _total: usize) {}

    fn compared(&mut self, _pairs: u64, _total_pairs: u64) {}
}
