// Core modules
mod crypto_hash;

pub mod batch_processor;
pub mod extractor;
pub mod perceptual;

// Expose cryptographic hash calculations
pub use crypto_hash::*;

// Expose perceptual hash
pub use perceptual::{ahash_from_grid, calculate_ahash, hamming_distance, PHash};

// Reexport core functionality
pub use batch_processor::{hash_images, process_in_pool, BatchConfig};
pub use extractor::{
    extractor_for, FallbackHasher, FingerprintExtractor, ImageCrateHasher, ImageMagickHasher,
};
