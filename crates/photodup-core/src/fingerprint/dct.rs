//! DCT-based perceptual hash (pHash).
//!
//! The grayscale image is resampled to a `4 * hash_size` square, a 2-D
//! DCT-II is taken, and the top-left `hash_size x hash_size` block of
//! low-frequency coefficients is thresholded against its median.

use image::imageops::{self, FilterType};
use image::GrayImage;

use super::hash::ImageHash;
use crate::error::{FingerprintError, FingerprintResult};

/// Resampling factor between the hash grid and the DCT input.
const HIGHFREQ_FACTOR: u32 = 4;

/// Compute the pHash of a grayscale image.
///
/// `hash_size` below 2 leaves no coefficients to threshold and is rejected.
pub(crate) fn dct_hash(gray: &GrayImage, hash_size: u32) -> FingerprintResult<ImageHash> {
    if hash_size < 2 {
        return Err(FingerprintError::Degenerate(format!(
            "hash size {hash_size} is too small"
        )));
    }
    let (width, height) = gray.dimensions();
    if width < 2 || height < 2 {
        return Err(FingerprintError::Degenerate(format!(
            "{width}x{height} image is too small to hash"
        )));
    }

    let side = hash_size * HIGHFREQ_FACTOR;
    let small = imageops::resize(gray, side, side, FilterType::Lanczos3);
    let pixels: Vec<f64> = small.as_raw().iter().map(|&p| f64::from(p)).collect();

    let n = side as usize;
    let k = hash_size as usize;
    let table = cosine_table(n, k);

    // Row pass: only the first k frequencies of each row are needed.
    let mut rows = vec![0.0f64; n * k];
    for y in 0..n {
        let row = &pixels[y * n..(y + 1) * n];
        for u in 0..k {
            let basis = &table[u * n..(u + 1) * n];
            rows[y * k + u] = row.iter().zip(basis).map(|(p, c)| p * c).sum();
        }
    }

    // Column pass over the k retained columns.
    let mut coeffs = vec![0.0f64; k * k];
    for v in 0..k {
        let basis = &table[v * n..(v + 1) * n];
        for u in 0..k {
            coeffs[v * k + u] = (0..n).map(|y| rows[y * k + u] * basis[y]).sum();
        }
    }

    let median = median(&coeffs);
    Ok(ImageHash::from_bits(coeffs.iter().map(|&c| c > median)))
}

/// Whether every pixel has the same value.
pub(crate) fn is_flat(gray: &GrayImage) -> bool {
    match gray.as_raw().split_first() {
        Some((first, rest)) => rest.iter().all(|p| p == first),
        None => true,
    }
}

/// Luma standard deviation.
pub(crate) fn std_dev(gray: &GrayImage) -> f32 {
    let raw = gray.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let count = raw.len() as f64;
    let mean = raw.iter().map(|&p| f64::from(p)).sum::<f64>() / count;
    let variance = raw
        .iter()
        .map(|&p| {
            let d = f64::from(p) - mean;
            d * d
        })
        .sum::<f64>()
        / count;
    variance.sqrt() as f32
}

/// `table[u * n + x] = cos(pi * (2x + 1) * u / 2n)` for the first `k` frequencies.
fn cosine_table(n: usize, k: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n * k);
    for u in 0..k {
        for x in 0..n {
            let angle = std::f64::consts::PI * (2 * x + 1) as f64 * u as f64 / (2 * n) as f64;
            table.push(angle.cos());
        }
    }
    table
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn pattern(width: u32, height: u32, phase: f64) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let fx = x as f64 / width as f64;
            let fy = y as f64 / height as f64;
            let v = 128.0
                + 60.0 * (fx * 7.0 + phase).sin()
                + 50.0 * (fy * 5.0 - phase * 2.0).cos()
                + 15.0 * ((fx + fy) * 11.0).sin();
            Luma([v.clamp(0.0, 255.0) as u8])
        })
    }

    #[test]
    fn test_hash_has_requested_length() {
        let img = pattern(100, 80, 0.0);
        assert_eq!(dct_hash(&img, 8).unwrap().bit_len(), 64);
        assert_eq!(dct_hash(&img, 16).unwrap().bit_len(), 256);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let img = pattern(120, 90, 0.3);
        assert_eq!(dct_hash(&img, 8).unwrap(), dct_hash(&img, 8).unwrap());
    }

    #[test]
    fn test_hash_bits_are_balanced_by_median() {
        let hash = dct_hash(&pattern(64, 64, 1.0), 8).unwrap();
        // Distance to the all-zero hash is the number of set bits
        let set_bits = hash
            .distance(&ImageHash::from_bits(vec![false; 64]))
            .unwrap();
        assert!((24..=40).contains(&set_bits), "set bits: {set_bits}");
    }

    #[test]
    fn test_tiny_image_is_degenerate() {
        let img = GrayImage::new(1, 10);
        assert!(matches!(
            dct_hash(&img, 8),
            Err(FingerprintError::Degenerate(_))
        ));
    }

    #[test]
    fn test_zero_hash_size_is_rejected() {
        let img = pattern(64, 64, 0.3);
        for size in [0, 1] {
            assert!(matches!(dct_hash(&img, size), Err(FingerprintError::Degenerate(_))));
        }
    }

    #[test]
    fn test_inverted_image_is_far_apart() {
        let img = pattern(128, 128, 0.0);
        let mut inverted = img.clone();
        imageops::invert(&mut inverted);
        let a = dct_hash(&img, 8).unwrap();
        let b = dct_hash(&inverted, 8).unwrap();
        // Negating the AC coefficients flips every bit except DC and the median pair
        assert!(a.distance(&b).unwrap() > 50);
    }

    #[test]
    fn test_flatness_and_std_dev() {
        let flat = GrayImage::from_pixel(10, 10, Luma([90]));
        assert!(is_flat(&flat));
        assert_eq!(std_dev(&flat), 0.0);
        let img = pattern(32, 32, 0.0);
        assert!(!is_flat(&img));
        assert!(std_dev(&img) > 10.0);
    }
}
