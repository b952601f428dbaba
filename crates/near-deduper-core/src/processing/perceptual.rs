//! # Average Hash (aHash)
//!
//! Perceptual fingerprints that stay close for visually similar images, unlike
//! cryptographic hashes where a one-byte change scrambles the whole digest.
//!
//! ## Algorithm
//!
//! 1. Convert the image to 8-bit grayscale
//! 2. Resize to exactly 8×8 with a triangle (bilinear) filter
//! 3. Compute the mean brightness of the 64 cells
//! 4. Bit *k* is set iff cell *k* (row-major) is strictly brighter than the mean
//!
//! ## Hamming Distance Interpretation
//!
//! Similarity is the number of differing bits between two fingerprints:
//!
//! - 0-5: Same image, recompressed or resized
//! - 6-10: Light edits (crop, exposure)
//! - 11-16: Heavier edits, with growing risk of unrelated matches
//! - >16: Different images
//!
//! Grouping is transitive, so a chain of close pairs can join two images that are
//! individually far apart. Pick a lower threshold if that matters.

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the downsampled grid
pub const GRID_SIZE: u32 = 8;

/// Number of cells in the grid, and bits in the hash
pub const GRID_CELLS: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// A perceptual hash represented as a 64-bit value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PHash(pub u64);

impl PHash {
    /// Calculate the Hamming distance between two perceptual hashes
    pub fn distance(&self, other: &PHash) -> u32 {
        hamming_distance(self.0, other.0)
    }

    /// Check if two images are perceptually similar based on a threshold
    pub fn is_similar(&self, other: &PHash, threshold: u32) -> bool {
        self.distance(other) <= threshold
    }
}

impl fmt::Display for PHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Number of differing bits between two 64-bit values
#[inline]
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Pack a row-major 8×8 grayscale grid into an aHash.
///
/// Only the first 64 values are used; returns `None` if fewer are supplied.
pub fn ahash_from_grid(pixels: &[u8]) -> Option<PHash> {
    let grid = pixels.get(..GRID_CELLS)?;

    let sum: u32 = grid.iter().map(|&p| p as u32).sum();
    let mean = sum as f64 / GRID_CELLS as f64;

    let mut hash: u64 = 0;
    for (bit_pos, &p) in grid.iter().enumerate() {
        if p as f64 > mean {
            hash |= 1u64 << bit_pos;
        }
    }

    Some(PHash(hash))
}

/// Calculate the 64-bit average hash of a decoded image
pub fn calculate_ahash(img: &DynamicImage) -> PHash {
    let gray = img.to_luma8();
    let small = image::imageops::resize(&gray, GRID_SIZE, GRID_SIZE, FilterType::Triangle);

    // An 8x8 Luma8 buffer always holds exactly 64 bytes
    ahash_from_grid(small.as_raw()).unwrap_or(PHash(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_distance_basics() {
        let a = PHash(0);
        let b = PHash(u64::MAX);
        let c = PHash(0b1011);

        assert_eq!(a.distance(&a), 0);
        assert_eq!(a.distance(&b), 64);
        assert_eq!(a.distance(&c), 3);
        assert_eq!(c.distance(&a), a.distance(&c));
        assert!(a.is_similar(&c, 3));
        assert!(!a.is_similar(&c, 2));
    }

    #[test]
    fn test_distance_triangle_inequality() {
        let samples = [0u64, 1, 0xff, 0xf0f0, u64::MAX, 0x1234_5678_9abc_def0];
        for &x in &samples {
            for &y in &samples {
                for &z in &samples {
                    assert!(hamming_distance(x, z) <= hamming_distance(x, y) + hamming_distance(y, z));
                }
            }
        }
    }

    #[test]
    fn test_grid_bits_are_row_major_from_lsb() {
        // First cell bright, everything else dark: only bit 0 set
        let mut grid = [10u8; GRID_CELLS];
        grid[0] = 200;
        assert_eq!(ahash_from_grid(&grid), Some(PHash(1)));

        // Last cell bright: only bit 63 set
        let mut grid = [10u8; GRID_CELLS];
        grid[63] = 200;
        assert_eq!(ahash_from_grid(&grid), Some(PHash(1u64 << 63)));
    }

    #[test]
    fn test_uniform_grid_has_no_bits_set() {
        // Nothing is strictly brighter than the mean
        assert_eq!(ahash_from_grid(&[128u8; GRID_CELLS]), Some(PHash(0)));
    }

    #[test]
    fn test_short_grid_is_rejected() {
        assert_eq!(ahash_from_grid(&[0u8; 63]), None);
    }

    #[test]
    fn test_calculate_ahash_gradient() {
        // Left half dark, right half bright
        let img = GrayImage::from_fn(64, 64, |x, _| if x < 32 { Luma([20]) } else { Luma([230]) });
        let hash = calculate_ahash(&DynamicImage::ImageLuma8(img));

        let expected = (0..8).fold(0u64, |acc, row| acc | (0xf0u64 << (row * 8)));
        assert_eq!(hash, PHash(expected));
    }

    #[test]
    fn test_calculate_ahash_ignores_scale() {
        // Bright top-left and bottom-right quadrants
        let small = GrayImage::from_fn(16, 16, |x, y| {
            if (x < 8) == (y < 8) {
                Luma([220])
            } else {
                Luma([30])
            }
        });
        let large = image::imageops::resize(&small, 128, 128, FilterType::Nearest);

        let a = calculate_ahash(&DynamicImage::ImageLuma8(small));
        let b = calculate_ahash(&DynamicImage::ImageLuma8(large));

        let expected = (0..8).fold(0u64, |acc, row| {
            let byte = if row < 4 { 0x0fu64 } else { 0xf0u64 };
            acc | (byte << (row * 8))
        });
        assert_eq!(a, PHash(expected));
        assert_eq!(a, b);
    }
}
