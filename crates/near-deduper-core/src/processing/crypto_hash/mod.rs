//! Content digests for exact-duplicate detection.
//!
//! Files are streamed through BLAKE3 in 1 MiB chunks, so large JPEGs never need to
//! be held in memory whole.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;

use crate::error::Result;

const BUFFER_SIZE: usize = 1024 * 1024;

/// Compute the BLAKE3 digest of a file's contents
pub fn compute_cryptographic<P: AsRef<Path>>(path: P) -> Result<blake3::Hash> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}
