//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global-hash tier: maximum Hamming distance for a near-exact match.
pub const DEFAULT_GLOBAL_MAX_DISTANCE: u32 = 5;

/// Crop tier: maximum Hamming distance for two segment hashes to pair up.
pub const DEFAULT_SEGMENT_MAX_DISTANCE: u32 = 10;

/// Crop tier: share of the smaller segment set that must find a partner.
///
/// Tuning history went 0.15 -> 0.5; 0.5 is the later and stricter value.
pub const DEFAULT_SEGMENT_MATCH_FRACTION: f32 = 0.5;

/// Resize tier: maximum Hamming distance between resize hashes.
///
/// Tuning history went 18 -> 10; 10 is the later and stricter value.
pub const DEFAULT_RESIZE_MAX_DISTANCE: u32 = 10;

/// Upper bound on the size of one duplicate group.
pub const DEFAULT_MAX_GROUP_SIZE: usize = 12;

/// Photo store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory of the photo collection. Subdirectories are albums.
    pub root: PathBuf,

    /// Extensions treated as images (scanned)
    pub image_extensions: Vec<String>,

    /// Extensions treated as videos (listed, never scanned)
    pub video_extensions: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("~/.photodup/photos"),
            image_extensions: ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            video_extensions: ["mp4", "mov", "avi", "mkv", "webm", "m4v", "3gp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Fingerprint computation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Side of the global hash grid (8 => 64 bits)
    pub global_hash_size: u32,

    /// Square side the image is normalized to before the resize hash
    pub resize_dimension: u32,

    /// Side of the resize hash grid (16 => 256 bits)
    pub resize_hash_size: u32,

    /// Segment (crop-tolerant) hashing
    pub segments: SegmentConfig,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            global_hash_size: 8,
            resize_dimension: 128,
            resize_hash_size: 16,
            segments: SegmentConfig::default(),
        }
    }
}

/// Settings for content-defined segmentation.
///
/// The full-resolution image is lightly blurred, thresholded and split into
/// connected bright/dark regions; each large, textured region clear of the
/// image border is hashed over its bounding box. Regions follow the content
/// at native pixel pitch, so a crop reproduces every region that lies fully
/// inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Gaussian blur applied before thresholding, in pixels (0 disables)
    pub blur_sigma: f32,

    /// Luma threshold splitting bright and dark regions
    pub threshold: u8,

    /// Minimum region area in pixels
    pub min_segment_area: usize,

    /// Keep at most this many regions (largest first)
    pub max_segments: usize,

    /// Regions whose luma standard deviation is below this are skipped
    pub min_std_dev: f32,

    /// Side of each segment hash grid (8 => 64 bits)
    pub hash_size: u32,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            threshold: 128,
            min_segment_area: 200,
            max_segments: 24,
            min_std_dev: 2.0,
            hash_size: 8,
        }
    }
}

/// Thresholds of the three similarity tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub global_max_distance: u32,
    pub segment_max_distance: u32,
    pub segment_match_fraction: f32,
    pub resize_max_distance: u32,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            global_max_distance: DEFAULT_GLOBAL_MAX_DISTANCE,
            segment_max_distance: DEFAULT_SEGMENT_MAX_DISTANCE,
            segment_match_fraction: DEFAULT_SEGMENT_MATCH_FRACTION,
            resize_max_distance: DEFAULT_RESIZE_MAX_DISTANCE,
        }
    }
}

/// Grouping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// A group stops growing at this size
    pub max_group_size: usize,

    /// Compared pairs between two progress updates
    pub progress_batch: u64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            progress_batch: 2000,
        }
    }
}

/// Background job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Asynchronous scans allowed to run at the same time
    pub max_concurrent_scans: usize,

    /// Finished jobs are evicted after this many seconds
    pub retain_finished_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_scans: 2,
            retain_finished_secs: 3600,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: pretty, json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
