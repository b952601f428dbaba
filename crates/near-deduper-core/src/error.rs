use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the near-deduper library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// File or directory not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A fingerprint backend could not produce a hash
    #[error("Fingerprint extraction failed: {0}")]
    Extraction(String),

    /// Safety check failure
    #[error("Safety check failed: {0}")]
    SafetyCheck(String),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Errors that mean the run was misconfigured rather than failing midway
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::FileNotFound(_))
    }
}
