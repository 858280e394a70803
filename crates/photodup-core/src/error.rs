//! Error types for the photodup duplicate-detection engine.
//!
//! Errors are organized by concern. Fingerprint failures are soft: they are
//! carried per fingerprint kind and only disable the similarity tier that
//! needs them, they never abort a scan.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::JobId;

/// Top-level error type for photodup operations.
#[derive(Error, Debug)]
pub enum PhotodupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Photo store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Scan job errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by a [`PhotoStore`](crate::store::PhotoStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The photo (or its content) does not exist
    #[error("Photo not found: {0}")]
    NotFound(String),

    /// Reading from the backing storage failed
    #[error("Store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single fingerprint kind is missing for a photo.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// The image bytes could not be decoded
    #[error("decode failed: {0}")]
    Decode(String),

    /// Perceptual hashing is not compiled into this build
    #[error("perceptual hashing unavailable")]
    Unavailable,

    /// The image (or region) is too small or too flat to carry a signature
    #[error("no usable signal: {0}")]
    Degenerate(String),

    /// Nothing was computed, e.g. the photo's bytes could not be read
    #[error("not computed: {0}")]
    NotComputed(String),
}

/// Scan job errors.
#[derive(Error, Debug)]
pub enum ScanError {
    /// No job is registered under this id
    #[error("Scan job not found: {0}")]
    JobNotFound(JobId),

    /// Listing candidates from the photo store failed
    #[error("Photo store failed: {0}")]
    Store(#[from] StoreError),

    /// The scan worker failed unexpectedly (panic or join failure)
    #[error("Scan worker failed: {0}")]
    WorkerFailed(String),
}

/// Convenience type alias for photodup results.
pub type Result<T> = std::result::Result<T, PhotodupError>;

/// Result of computing one fingerprint kind.
pub type FingerprintResult<T> = std::result::Result<T, FingerprintError>;
