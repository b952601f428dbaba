use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Largest meaningful Hamming distance between two 64-bit fingerprints
pub const MAX_THRESHOLD: u32 = 64;

/// Named similarity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMode {
    /// Only very close matches (threshold 5)
    Conservative,

    /// Balanced default (threshold 10)
    #[default]
    Medium,

    /// Catches heavier edits, more chaining (threshold 16)
    Aggressive,
}

impl SimilarityMode {
    /// Hamming threshold used by this preset
    pub fn threshold(self) -> Threshold {
        match self {
            Self::Conservative => Threshold(5),
            Self::Medium => Threshold(10),
            Self::Aggressive => Threshold(16),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Medium => "medium",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for SimilarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "conservative" | "c" => Ok(Self::Conservative),
            "medium" | "m" => Ok(Self::Medium),
            "aggressive" | "a" => Ok(Self::Aggressive),
            other => Err(Error::Configuration(format!(
                "Unknown similarity mode '{}' (expected conservative, medium or aggressive)",
                other
            ))),
        }
    }
}

/// A Hamming-distance threshold known to lie in `0..=64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Threshold(u32);

impl Threshold {
    pub fn new(value: i32) -> Result<Self> {
        if value < 0 || value as u32 > MAX_THRESHOLD {
            return Err(Error::Configuration(format!(
                "Threshold must be between 0 and {}, got {}",
                MAX_THRESHOLD, value
            )));
        }
        Ok(Self(value as u32))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which backend computes the 8x8 grayscale grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashBackend {
    /// Decode with the `image` crate, fall back to ImageMagick on failure
    #[default]
    Auto,

    /// `image` crate only
    Image,

    /// External ImageMagick binary only
    ImageMagick,
}

impl FromStr for HashBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "image" => Ok(Self::Image),
            "imagemagick" | "magick" => Ok(Self::ImageMagick),
            other => Err(Error::Configuration(format!(
                "Unknown hash backend '{}' (expected auto, image or imagemagick)",
                other
            ))),
        }
    }
}

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for a deduplication run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root folder to scan
    pub root: PathBuf,

    /// Similarity preset
    pub mode: SimilarityMode,

    /// Explicit Hamming threshold, overrides the preset when set
    pub threshold: Option<i32>,

    /// Delete proposed duplicates
    pub delete: bool,

    /// Confirmation required for `delete` to take effect
    pub confirm: bool,

    /// Where review and removal manifests are written
    pub manifest_dir: PathBuf,

    /// Number of threads to use for hashing (0 = auto)
    pub threads: usize,

    /// Maximum directory depth for scanning
    pub max_depth: Option<usize>,

    /// Fingerprint backend
    pub backend: HashBackend,

    /// Draw a progress bar while hashing
    pub show_progress: bool,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("images"),
            mode: SimilarityMode::Medium,
            threshold: None,
            delete: false,
            confirm: false,
            manifest_dir: PathBuf::from("."),
            threads: 0, // Auto
            max_depth: None,
            backend: HashBackend::Auto,
            show_progress: true,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Threshold in effect: the explicit override if present, otherwise the mode preset
    pub fn effective_threshold(&self) -> Result<Threshold> {
        match self.threshold {
            Some(value) => Threshold::new(value),
            None => Ok(self.mode.threshold()),
        }
    }

    /// Number of hashing threads, resolving 0 to the CPU count
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.effective_threshold()?;

        if self.root.as_os_str().is_empty() {
            return Err(Error::Configuration("Root folder must not be empty".to_string()));
        }

        if self.max_depth == Some(0) {
            return Err(Error::Configuration(
                "Maximum depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
