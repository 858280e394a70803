//! Content-derived fingerprints for duplicate detection.
//!
//! Three independent fingerprints are derived from one decoded image:
//! - **global**: pHash of the whole image (64 bits by default)
//! - **segments**: pHashes of content-defined regions, for crop tolerance
//! - **resize**: pHash of a fixed-size grayscale copy with a finer grid,
//!   for scale changes and aggressive crops
//!
//! Each kind is a separate `Result`; losing one never blocks the others.
//! Without the `perceptual-hash` feature every kind is `Unavailable`.

#[cfg(feature = "perceptual-hash")]
mod dct;
mod hash;
#[cfg(feature = "perceptual-hash")]
mod segment;

pub use hash::ImageHash;

use crate::config::FingerprintConfig;
use crate::error::{FingerprintError, FingerprintResult};

/// The three fingerprints of one image.
#[derive(Debug, Clone)]
pub struct FingerprintSet {
    pub global: FingerprintResult<ImageHash>,
    pub segments: FingerprintResult<Vec<ImageHash>>,
    pub resize: FingerprintResult<ImageHash>,
}

impl FingerprintSet {
    /// A set where every kind failed for the same reason.
    pub fn unavailable(reason: FingerprintError) -> Self {
        Self {
            global: Err(reason.clone()),
            segments: Err(reason.clone()),
            resize: Err(reason),
        }
    }

    /// Number of fingerprint kinds that were computed.
    pub fn available_kinds(&self) -> usize {
        [
            self.global.is_ok(),
            self.segments.is_ok(),
            self.resize.is_ok(),
        ]
        .iter()
        .filter(|ok| **ok)
        .count()
    }

    /// Failures, labelled by fingerprint kind.
    pub fn failures(&self) -> Vec<(&'static str, &FingerprintError)> {
        let mut failures = Vec::new();
        if let Err(e) = &self.global {
            failures.push(("global", e));
        }
        if let Err(e) = &self.segments {
            failures.push(("segments", e));
        }
        if let Err(e) = &self.resize {
            failures.push(("resize", e));
        }
        failures
    }
}

/// Derives [`FingerprintSet`]s from raw image bytes.
#[derive(Debug, Clone)]
pub struct FingerprintComputer {
    config: FingerprintConfig,
}

impl Default for FingerprintComputer {
    fn default() -> Self {
        Self::new(FingerprintConfig::default())
    }
}

impl FingerprintComputer {
    pub fn new(config: FingerprintConfig) -> Self {
        Self { config }
    }

    /// Whether perceptual hashing is compiled into this build.
    pub const fn is_available() -> bool {
        cfg!(feature = "perceptual-hash")
    }

    /// Bit length of the global hash.
    pub fn global_hash_bits(&self) -> u32 {
        self.config.global_hash_size * self.config.global_hash_size
    }

    /// Compute all fingerprints of an encoded image.
    pub fn compute(&self, bytes: &[u8]) -> FingerprintSet {
        self.compute_with_cached(bytes, None)
    }

    /// Compute all fingerprints, reusing a cached global hash (hex) when it
    /// is well-formed for the configured hash size.
    pub fn compute_with_cached(&self, bytes: &[u8], cached_global: Option<&str>) -> FingerprintSet {
        let cached = cached_global.and_then(|hex| {
            let parsed = ImageHash::from_hex(hex, self.global_hash_bits());
            if parsed.is_none() {
                tracing::debug!("Ignoring malformed cached global hash {:?}", hex);
            }
            parsed
        });
        self.compute_inner(bytes, cached)
    }

    #[cfg(feature = "perceptual-hash")]
    fn compute_inner(&self, bytes: &[u8], cached_global: Option<ImageHash>) -> FingerprintSet {
        match image::load_from_memory(bytes) {
            Ok(image) => {
                let mut set = self.compute_image(&image);
                if let Some(hash) = cached_global {
                    set.global = Ok(hash);
                }
                set
            }
            Err(e) => {
                let mut set = FingerprintSet::unavailable(FingerprintError::Decode(e.to_string()));
                if let Some(hash) = cached_global {
                    set.global = Ok(hash);
                }
                set
            }
        }
    }

    #[cfg(not(feature = "perceptual-hash"))]
    fn compute_inner(&self, _bytes: &[u8], _cached_global: Option<ImageHash>) -> FingerprintSet {
        // Cached hashes are ignored too: without hashing a scan is a no-op.
        FingerprintSet::unavailable(FingerprintError::Unavailable)
    }

    /// Compute all fingerprints of an already decoded image.
    #[cfg(feature = "perceptual-hash")]
    pub fn compute_image(&self, image: &image::DynamicImage) -> FingerprintSet {
        let gray = image.to_luma8();
        FingerprintSet {
            global: self.global_hash(&gray),
            segments: segment::segment_hashes(&gray, &self.config.segments),
            resize: self.resize_hash(&gray),
        }
    }

    #[cfg(feature = "perceptual-hash")]
    fn global_hash(&self, gray: &image::GrayImage) -> FingerprintResult<ImageHash> {
        if dct::is_flat(gray) {
            return Err(FingerprintError::Degenerate("image is a single flat color".into()));
        }
        dct::dct_hash(gray, self.config.global_hash_size)
    }

    #[cfg(feature = "perceptual-hash")]
    fn resize_hash(&self, gray: &image::GrayImage) -> FingerprintResult<ImageHash> {
        use image::imageops::{self, FilterType};

        if dct::is_flat(gray) {
            return Err(FingerprintError::Degenerate("image is a single flat color".into()));
        }
        let side = self.config.resize_dimension;
        let normalized = imageops::resize(gray, side, side, FilterType::Triangle);
        dct::dct_hash(&normalized, self.config.resize_hash_size)
    }
}

#[cfg(all(test, feature = "perceptual-hash"))]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    fn textured(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = 128.0
                + 70.0 * ((x as f64) / 17.0).sin() * ((y as f64) / 29.0).cos()
                + 40.0 * ((x + 2 * y) as f64 / 41.0).sin();
            Luma([v.clamp(0.0, 255.0) as u8])
        })
    }

    fn png_bytes(img: GrayImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_unvalidated_zero_hash_sizes_fail_softly() {
        let mut config = FingerprintConfig::default();
        config.global_hash_size = 0;
        config.segments.hash_size = 0;
        let set = FingerprintComputer::new(config).compute(&png_bytes(textured(96, 96)));

        assert!(matches!(set.global, Err(FingerprintError::Degenerate(_))));
        assert!(matches!(set.segments, Err(FingerprintError::Degenerate(_))));
        assert!(set.resize.is_ok());
    }

    #[test]
    fn test_computes_all_kinds() {
        let set = FingerprintComputer::default().compute(&png_bytes(textured(160, 120)));
        assert_eq!(set.available_kinds(), 3);
        assert_eq!(set.global.as_ref().unwrap().bit_len(), 64);
        assert_eq!(set.resize.as_ref().unwrap().bit_len(), 256);
        assert!(!set.segments.as_ref().unwrap().is_empty());
        assert!(set.failures().is_empty());
    }

    #[test]
    fn test_identical_bytes_give_identical_fingerprints() {
        let bytes = png_bytes(textured(90, 90));
        let computer = FingerprintComputer::default();
        let a = computer.compute(&bytes);
        let b = computer.compute(&bytes.clone());
        assert_eq!(a.global.unwrap().distance(b.global.as_ref().unwrap()), Some(0));
        assert_eq!(a.segments.unwrap(), b.segments.unwrap());
    }

    #[test]
    fn test_garbage_bytes_fail_softly() {
        let set = FingerprintComputer::default().compute(b"definitely not an image");
        assert_eq!(set.available_kinds(), 0);
        assert!(matches!(set.global, Err(FingerprintError::Decode(_))));
        assert_eq!(set.failures().len(), 3);
    }

    #[test]
    fn test_cached_global_hash_is_used() {
        let computer = FingerprintComputer::default();
        let cached = ImageHash::from_bits((0..64).map(|i| i % 2 == 0));
        let set = computer.compute_with_cached(&png_bytes(textured(64, 64)), Some(&cached.to_hex()));
        assert_eq!(set.global.unwrap(), cached);
    }

    #[test]
    fn test_malformed_cached_hash_is_recomputed() {
        let computer = FingerprintComputer::default();
        let bytes = png_bytes(textured(64, 64));
        let fresh = computer.compute(&bytes).global.unwrap();
        let set = computer.compute_with_cached(&bytes, Some("not-hex"));
        assert_eq!(set.global.unwrap(), fresh);
    }

    #[test]
    fn test_cached_hash_survives_decode_failure() {
        let computer = FingerprintComputer::default();
        let cached = ImageHash::from_bits((0..64).map(|i| i < 10));
        let set = computer.compute_with_cached(b"junk", Some(&cached.to_hex()));
        assert!(set.global.is_ok());
        assert!(set.segments.is_err());
        assert!(set.resize.is_err());
    }

    #[test]
    fn test_flat_image_has_no_usable_fingerprint() {
        let set = FingerprintComputer::default()
            .compute(&png_bytes(GrayImage::from_pixel(50, 50, Luma([10]))));
        assert!(matches!(set.global, Err(FingerprintError::Degenerate(_))));
        assert!(matches!(set.resize, Err(FingerprintError::Degenerate(_))));
        assert!(matches!(set.segments, Err(FingerprintError::Degenerate(_))));
    }

    #[test]
    fn test_hashing_is_available_with_feature() {
        assert!(FingerprintComputer::is_available());
    }
}
