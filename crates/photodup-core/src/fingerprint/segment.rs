//! Crop-tolerant segment hashes.
//!
//! The image is blurred at native resolution, split at a fixed luma
//! threshold into 4-connected bright and dark regions, and every large
//! region with enough texture is hashed over its bounding box. Regions that
//! reach the border band are dropped: they may continue past the frame.
//!
//! Nothing here depends on the image size, so a crop reproduces, pixel for
//! pixel, every region that lies fully inside it, and those regions hash
//! identically in both images.

use std::borrow::Cow;

use image::imageops;
use image::GrayImage;

use super::dct::{dct_hash, std_dev};
use super::hash::ImageHash;
use crate::config::SegmentConfig;
use crate::error::{FingerprintError, FingerprintResult};

/// A connected region, bounds exclusive on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    pub area: usize,
}

impl Region {
    /// Whether the region stays at least `margin` pixels away from every
    /// edge of a `width x height` image.
    fn clear_of_border(&self, margin: u32, width: u32, height: u32) -> bool {
        self.x0 >= margin
            && self.y0 >= margin
            && self.x1.saturating_add(margin) <= width
            && self.y1.saturating_add(margin) <= height
    }

    fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Compute the segment hashes of a grayscale image.
///
/// Falls back to a single whole-image hash when no region qualifies, and
/// fails with `Degenerate` when even the whole image has no texture.
pub(crate) fn segment_hashes(
    gray: &GrayImage,
    config: &SegmentConfig,
) -> FingerprintResult<Vec<ImageHash>> {
    let (width, height) = gray.dimensions();
    if width < 2 || height < 2 {
        return Err(FingerprintError::Degenerate(format!(
            "{width}x{height} image is too small to segment"
        )));
    }

    let blurred = smoothed(gray, config.blur_sigma);
    let margin = border_margin(config.blur_sigma);
    let regions = find_regions(&blurred, config.threshold, config.min_segment_area);

    let mut hashes = Vec::new();
    for region in regions
        .iter()
        .filter(|r| r.clear_of_border(margin, width, height))
    {
        if hashes.len() >= config.max_segments {
            break;
        }
        if region.width() < 2 || region.height() < 2 {
            continue;
        }
        let crop = imageops::crop_imm(gray, region.x0, region.y0, region.width(), region.height())
            .to_image();
        if std_dev(&crop) < config.min_std_dev {
            continue;
        }
        if let Ok(hash) = dct_hash(&crop, config.hash_size) {
            hashes.push(hash);
        }
    }

    if hashes.is_empty() {
        if std_dev(gray) < config.min_std_dev {
            return Err(FingerprintError::Degenerate(
                "no textured region to hash".to_string(),
            ));
        }
        hashes.push(dct_hash(gray, config.hash_size)?);
    }

    Ok(hashes)
}

/// Blurred copy used for thresholding. Hashes are still taken from the
/// unblurred pixels.
fn smoothed(gray: &GrayImage, sigma: f32) -> Cow<'_, GrayImage> {
    if sigma > 0.0 {
        Cow::Owned(imageops::blur(gray, sigma))
    } else {
        Cow::Borrowed(gray)
    }
}

/// Width of the border band in which blurred pixels depend on content
/// outside the frame. Always at least one pixel, so regions touching the
/// edge are dropped.
fn border_margin(sigma: f32) -> u32 {
    if sigma > 0.0 {
        (sigma * 4.0).ceil() as u32 + 1
    } else {
        1
    }
}

/// Label 4-connected regions on either side of `threshold` and return those
/// with at least `min_area` pixels, largest first (scan order on ties).
pub(crate) fn find_regions(gray: &GrayImage, threshold: u8, min_area: usize) -> Vec<Region> {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let raw = gray.as_raw();
    let bright = |i: usize| raw[i] > threshold;

    let mut visited = vec![false; w * h];
    let mut stack = Vec::new();
    let mut regions = Vec::new();

    for start in 0..w * h {
        if visited[start] {
            continue;
        }
        let class = bright(start);
        visited[start] = true;
        stack.push(start);

        let mut region = Region {
            x0: u32::MAX,
            y0: u32::MAX,
            x1: 0,
            y1: 0,
            area: 0,
        };

        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            region.area += 1;
            region.x0 = region.x0.min(x as u32);
            region.y0 = region.y0.min(y as u32);
            region.x1 = region.x1.max(x as u32 + 1);
            region.y1 = region.y1.max(y as u32 + 1);

            let mut visit = |j: usize| {
                if !visited[j] && bright(j) == class {
                    visited[j] = true;
                    stack.push(j);
                }
            };
            if x > 0 {
                visit(i - 1);
            }
            if x + 1 < w {
                visit(i + 1);
            }
            if y > 0 {
                visit(i - w);
            }
            if y + 1 < h {
                visit(i + w);
            }
        }

        if region.area >= min_area {
            regions.push(region);
        }
    }

    regions.sort_by(|a, b| b.area.cmp(&a.area));
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scene;
    use image::Luma;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_find_regions_separates_classes() {
        let img = scene(100, 100, &[(10, 10, 20, 20), (60, 60, 30, 30)]);
        let regions = find_regions(&img, 128, 50);
        assert_eq!(regions.len(), 3);
        // Background is largest, then the 30x30 blob, then the 20x20 one
        assert_eq!(regions[1], Region { x0: 60, y0: 60, x1: 90, y1: 90, area: 900 });
        assert_eq!(regions[2], Region { x0: 10, y0: 10, x1: 30, y1: 30, area: 400 });
        assert_eq!(regions[0].area, 100 * 100 - 900 - 400);
    }

    #[test]
    fn test_find_regions_drops_small_regions() {
        let img = scene(100, 100, &[(10, 10, 5, 5), (60, 60, 30, 30)]);
        let regions = find_regions(&img, 128, 50);
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.area >= 50));
    }

    #[test]
    fn test_flat_image_is_degenerate() {
        let img = GrayImage::from_pixel(64, 64, Luma([200]));
        assert!(matches!(
            segment_hashes(&img, &SegmentConfig::default()),
            Err(FingerprintError::Degenerate(_))
        ));
    }

    #[test]
    fn test_border_regions_are_dropped() {
        let config = SegmentConfig::default();

        // Only a blob touching the left edge: nothing qualifies
        let edge_only = scene(200, 200, &[(0, 40, 50, 50)]);
        let hashes = segment_hashes(&edge_only, &config).unwrap();
        assert_eq!(hashes, vec![dct_hash(&edge_only, config.hash_size).unwrap()]);

        // Adding an inner blob yields exactly that one region
        let img = scene(200, 200, &[(0, 40, 50, 50), (110, 110, 50, 60)]);
        let hashes = segment_hashes(&img, &config).unwrap();
        assert_eq!(hashes.len(), 1);
        assert_ne!(hashes[0], dct_hash(&img, config.hash_size).unwrap());
    }

    #[test]
    fn test_region_border_clearance() {
        let region = Region { x0: 5, y0: 6, x1: 40, y1: 50, area: 100 };
        assert!(region.clear_of_border(5, 45, 56));
        assert!(!region.clear_of_border(6, 100, 100));
        assert!(!region.clear_of_border(5, 44, 100));
        assert!(!region.clear_of_border(5, 100, 54));
    }

    /// Blobs of random size and position; some are cut by the crop.
    fn random_blobs(rng: &mut StdRng, width: u32, height: u32, count: usize) -> Vec<(u32, u32, u32, u32)> {
        (0..count)
            .map(|_| {
                let w = rng.gen_range(60..200);
                let h = rng.gen_range(60..200);
                (rng.gen_range(0..width - w), rng.gen_range(0..height - h), w, h)
            })
            .collect()
    }

    #[test]
    fn test_crop_regions_are_a_subset_at_full_resolution() {
        let config = SegmentConfig::default();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let full = scene(1200, 900, &random_blobs(&mut rng, 1200, 900, 6));
            // Centre crop keeping 64% of the area
            let crop = imageops::crop_imm(&full, 120, 90, 960, 720).to_image();

            let a = segment_hashes(&full, &config).unwrap();
            let b = segment_hashes(&crop, &config).unwrap();
            if b.len() == 1 && !a.contains(&b[0]) {
                // Only the whole-image fallback: no blob lies inside the crop
                continue;
            }
            assert!(b.len() <= a.len(), "seed {seed}: {} vs {}", b.len(), a.len());
            assert!(b.iter().all(|h| a.contains(h)), "seed {seed}");
        }
    }
}
