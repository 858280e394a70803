//! Job registry: starts scans, tracks their progress records and serves polls.
//!
//! Asynchronous scans run as Tokio tasks bounded by a semaphore. The CPU
//! work of each scan runs on the blocking pool, and the supervising task
//! turns a panic there into the job's error, so no job is ever left
//! non-terminal. A job waiting for a permit stays `pending`.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;

use super::engine::DuplicateScanner;
use super::job::ScanJob;
use super::ScanProgress;
use crate::config::{Config, JobsConfig};
use crate::error::ScanError;
use crate::store::PhotoStore;
use crate::types::{JobId, Photo, ScanOutcome, ScanStatus, ScanTicket};

type JobSlot = Arc<Mutex<ScanJob>>;

/// Lock a job record. Records are plain data, so a poisoned lock is still
/// consistent and is recovered.
fn lock(job: &Mutex<ScanJob>) -> MutexGuard<'_, ScanJob> {
    job.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to a registered scan job.
struct JobHandle(JobSlot);

impl ScanProgress for JobHandle {
    fn fingerprinted(&mut self, scanned: usize, total: usize) {
        lock(&self.0).fingerprinted(scanned, total);
    }

    fn compared(&mut self, pairs: u64, total_pairs: u64) {
        lock(&self.0).compared(pairs, total_pairs);
    }
}

/// Registry of scan jobs over one photo store.
///
/// Cheap to clone; clones share jobs and the worker pool.
#[derive(Clone, Debug)]
pub struct JobRegistry {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    scanner: DuplicateScanner,
    jobs: RwLock<HashMap<JobId, JobSlot>>,
    permits: Arc<Semaphore>,
    retain_finished: Duration,
}

impl JobRegistry {
    pub fn new(scanner: DuplicateScanner, config: &JobsConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                scanner,
                jobs: RwLock::new(HashMap::new()),
                permits: Arc::new(Semaphore::new(config.max_concurrent_scans.max(1))),
                retain_finished: Duration::from_secs(config.retain_finished_secs),
            }),
        }
    }

    /// Registry over `store` with every engine setting taken from `config`.
    pub fn from_config(store: Arc<dyn PhotoStore>, config: &Config) -> Self {
        Self::new(DuplicateScanner::new(store, config), &config.jobs)
    }

    /// Start an asynchronous scan of `album_id` (or every album).
    ///
    /// Returns as soon as the candidates are listed and the job is
    /// registered. With fewer than two candidates the job is already done.
    pub async fn start(&self, album_id: Option<&str>) -> Result<ScanTicket, ScanError> {
        self.evict_finished();

        let scanner = self.inner.scanner.clone();
        let album = album_id.map(str::to_owned);
        let photos = tokio::task::spawn_blocking(move || scanner.candidates(album.as_deref()))
            .await
            .map_err(|e| ScanError::WorkerFailed(e.to_string()))??;

        let total = photos.len();
        let job_id = JobId::generate();
        let slot: JobSlot = Arc::new(Mutex::new(ScanJob::new(job_id.clone(), total)));
        self.jobs_mut().insert(job_id.clone(), slot.clone());
        tracing::info!(
            "Scan {} started: {} candidates (album: {})",
            job_id,
            total,
            album_id.unwrap_or("*")
        );

        if total < 2 {
            let mut job = lock(&slot);
            job.mark_running();
            job.complete(Vec::new());
            drop(job);
            tracing::info!("Scan {} done: nothing to compare", job_id);
        } else {
            tokio::spawn(supervise(
                self.inner.scanner.clone(),
                self.inner.permits.clone(),
                slot,
                photos,
            ));
        }

        Ok(ScanTicket { job_id, total })
    }

    /// Snapshot of a job's progress and, once done, its result.
    pub fn poll(&self, job_id: &JobId) -> Result<ScanStatus, ScanError> {
        let slot = self
            .jobs()
            .get(job_id)
            .cloned()
            .ok_or_else(|| ScanError::JobNotFound(job_id.clone()))?;
        let status = lock(&slot).snapshot();
        Ok(status)
    }

    /// Run a scan on the calling thread and return its result.
    ///
    /// Blocks for the whole O(n²) comparison pass; meant for small candidate
    /// sets. The transient job record is never published, so concurrent
    /// synchronous scans cannot observe each other.
    pub fn run_sync(&self, album_id: Option<&str>) -> Result<ScanOutcome, ScanError> {
        let scanner = &self.inner.scanner;
        let photos = scanner.candidates(album_id)?;
        let total = photos.len();
        let mut job = ScanJob::new(JobId::sync(), total);
        job.mark_running();
        tracing::info!("Synchronous scan of {} candidates", total);

        let started = Instant::now();
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| scanner.scan(photos, &mut job)));
        match result {
            Ok(groups) => {
                job.complete(groups);
                let (groups, scanned) = job.into_parts();
                tracing::info!(
                    "Synchronous scan done: {} groups from {} photos in {:?}",
                    groups.len(),
                    scanned,
                    started.elapsed()
                );
                Ok(ScanOutcome { groups, scanned })
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!("Synchronous scan failed: {}", message);
                Err(ScanError::WorkerFailed(message))
            }
        }
    }

    /// Number of image photos a scan of `album_id` would consider.
    pub fn photo_count(&self, album_id: Option<&str>) -> Result<usize, ScanError> {
        Ok(self.inner.scanner.candidates(album_id)?.len())
    }

    /// Drop terminal jobs that finished longer ago than the retention period.
    /// Returns how many were removed.
    pub fn evict_finished(&self) -> usize {
        let retain = self.inner.retain_finished;
        let mut jobs = self.jobs_mut();
        let before = jobs.len();
        jobs.retain(|_, slot| {
            lock(slot)
                .finished_at()
                .map_or(true, |finished| finished.elapsed() < retain)
        });
        let evicted = before - jobs.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} finished scan jobs", evicted);
        }
        evicted
    }

    /// Jobs that are pending or running.
    pub fn active_jobs(&self) -> usize {
        self.jobs()
            .values()
            .filter(|slot| !lock(slot).is_terminal())
            .count()
    }

    /// Jobs currently held, terminal ones included.
    pub fn job_count(&self) -> usize {
        self.jobs().len()
    }

    fn jobs(&self) -> std::sync::RwLockReadGuard<'_, HashMap<JobId, JobSlot>> {
        self.inner.jobs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn jobs_mut(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<JobId, JobSlot>> {
        self.inner.jobs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wait for a pool permit, run the scan on the blocking pool and record the
/// outcome.
async fn supervise(
    scanner: DuplicateScanner,
    permits: Arc<Semaphore>,
    slot: JobSlot,
    photos: Vec<Photo>,
) {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            let mut job = lock(&slot);
            job.mark_running();
            job.fail("scan worker pool is closed");
            return;
        }
    };

    let job_id = {
        let mut job = lock(&slot);
        job.mark_running();
        job.snapshot().job_id
    };

    let started = Instant::now();
    let mut handle = JobHandle(slot.clone());
    let result = tokio::task::spawn_blocking(move || scanner.scan(photos, &mut handle)).await;

    match result {
        Ok(groups) => {
            tracing::info!(
                "Scan {} done: {} groups in {:?}",
                job_id,
                groups.len(),
                started.elapsed()
            );
            lock(&slot).complete(groups);
        }
        Err(e) => {
            let message = if e.is_panic() {
                panic_message(e.into_panic().as_ref())
            } else {
                e.to_string()
            };
            tracing::error!("Scan {} failed: {}", job_id, message);
            lock(&slot).fail(message);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("scan worker panicked: {detail}")
}
