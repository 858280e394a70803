//! Synthetic images shared by unit tests.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bright rectangles that sit inside the `(35, 35, 170, 170)` crop of a
/// 240x240 scene.
pub(crate) const CROP_SCENE_BLOBS: [(u32, u32, u32, u32); 3] =
    [(60, 60, 40, 30), (120, 70, 35, 45), (70, 130, 50, 40)];

/// Dark textured background with bright textured rectangles.
pub(crate) fn scene(width: u32, height: u32, blobs: &[(u32, u32, u32, u32)]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        for (i, &(bx, by, bw, bh)) in blobs.iter().enumerate() {
            if x >= bx && x < bx + bw && y >= by && y < by + bh {
                let fx = (x - bx) as f64 / bw as f64;
                let fy = (y - by) as f64 / bh as f64;
                let k = i as f64 + 1.0;
                let v = 195.0 + 30.0 * (fx * 3.0 * k).sin() + 25.0 * (fy * (5.0 - k)).cos();
                return Luma([v as u8]);
            }
        }
        Luma([(40.0 + 30.0 * ((x as f64) / 23.0).sin() * ((y as f64) / 31.0).cos()) as u8])
    })
}

/// Uniform per-pixel noise from a seeded generator.
pub(crate) fn noise(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |_, _| Luma([rng.gen()]))
}

/// Lossless PNG encoding.
pub(crate) fn png_bytes(img: &GrayImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img.clone())
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}
