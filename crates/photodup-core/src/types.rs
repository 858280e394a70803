//! Core data types shared by the scan engine, the stores and the front ends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media a photo record points at. Only images are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A photo as seen by the engine.
///
/// Owned by the [`PhotoStore`](crate::store::PhotoStore); the engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Opaque identifier, unique within a store
    pub id: String,

    /// File name or content reference
    pub filename: String,

    /// Media kind ("image" or "video")
    #[serde(rename = "media_type")]
    pub media_kind: MediaKind,

    /// Album the photo belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,

    /// Cached global perceptual hash (hex), if the store has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_hash: Option<String>,
}

impl Photo {
    /// Create an image record without album or cached hash.
    pub fn image(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            media_kind: MediaKind::Image,
            album_id: None,
            global_hash: None,
        }
    }

    /// Builder-style album assignment.
    pub fn in_album(mut self, album_id: impl Into<String>) -> Self {
        self.album_id = Some(album_id.into());
        self
    }

    /// Whether this photo takes part in duplicate scans.
    pub fn is_image(&self) -> bool {
        self.media_kind == MediaKind::Image
    }
}

/// A cluster of at least two photos judged to be the same picture.
///
/// Serialized as a plain JSON array of photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateGroup(pub Vec<Photo>);

impl DuplicateGroup {
    pub fn photos(&self) -> &[Photo] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids of the member photos, in group order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.id.as_str())
    }
}

/// Identifier of a scan job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Reserved id of the transient record used by synchronous scans.
    pub const SYNC: &'static str = "sync";

    /// Generate a fresh asynchronous job id. Never equal to [`JobId::SYNC`].
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// The reserved synchronous-mode id.
    pub fn sync() -> Self {
        Self(Self::SYNC.to_string())
    }

    pub fn is_sync(&self) -> bool {
        self.0 == Self::SYNC
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a scan job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Done,
    Error,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// Returned when an asynchronous scan is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTicket {
    pub job_id: JobId,
    pub total: usize,
}

/// Point-in-time snapshot of a scan job, as returned by polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatus {
    pub job_id: JobId,
    pub state: JobState,
    /// Photos fingerprinted so far
    pub scanned: usize,
    /// Candidate photos in the scan
    pub total: usize,
    /// Overall progress, 0..=100, never decreasing
    pub percent: u8,
    /// True once the job is terminal (done or error)
    pub done: bool,
    pub groups: Vec<DuplicateGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final result of a synchronous scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub groups: Vec<DuplicateGroup>,
    pub scanned: usize,
}
