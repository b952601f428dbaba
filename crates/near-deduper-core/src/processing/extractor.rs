use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::HashBackend;
use crate::error::{Error, Result};
use crate::processing::perceptual::{ahash_from_grid, calculate_ahash, PHash, GRID_CELLS};

/// Produces a 64-bit perceptual fingerprint for an image file.
///
/// Implementations must be safe to call from several threads at once; each call
/// only reads its own file.
pub trait FingerprintExtractor: Send + Sync {
    fn fingerprint(&self, path: &Path) -> Result<PHash>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Decodes with the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateHasher;

impl FingerprintExtractor for ImageCrateHasher {
    fn fingerprint(&self, path: &Path) -> Result<PHash> {
        let img = image::open(path)?;
        Ok(calculate_ahash(&img))
    }

    fn name(&self) -> &'static str {
        "image"
    }
}

/// Shells out to ImageMagick for the 8x8 grayscale grid.
///
/// Tries `magick convert` (ImageMagick 7) first, then the legacy `convert` binary.
#[derive(Debug, Clone)]
pub struct ImageMagickHasher {
    programs: Vec<Vec<String>>,
}

impl Default for ImageMagickHasher {
    fn default() -> Self {
        Self {
            programs: vec![
                vec!["magick".to_string(), "convert".to_string()],
                vec!["convert".to_string()],
            ],
        }
    }
}

impl ImageMagickHasher {
    /// Use a custom command prefix, e.g. `["/opt/im/bin/magick", "convert"]`
    pub fn with_program(program: Vec<String>) -> Self {
        Self {
            programs: vec![program],
        }
    }

    fn run(&self, prefix: &[String], path: &Path) -> Result<PHash> {
        let (program, leading_args) = prefix
            .split_first()
            .ok_or_else(|| Error::Extraction("empty ImageMagick command".to_string()))?;

        let output = Command::new(program)
            .args(leading_args)
            .arg(path)
            .args([
                "-colorspace",
                "RGB",
                "-resize",
                "8x8!",
                "-colorspace",
                "Gray",
                "-depth",
                "8",
                "gray:-",
            ])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(Error::Extraction(format!(
                "{} exited with {}",
                program, output.status
            )));
        }

        ahash_from_grid(&output.stdout).ok_or_else(|| {
            Error::Extraction(format!(
                "unexpected gray output size: {} bytes, need {}",
                output.stdout.len(),
                GRID_CELLS
            ))
        })
    }
}

impl FingerprintExtractor for ImageMagickHasher {
    fn fingerprint(&self, path: &Path) -> Result<PHash> {
        let mut last_err = None;
        for prefix in &self.programs {
            match self.run(prefix, path) {
                Ok(hash) => return Ok(hash),
                Err(e) => {
                    debug!("ImageMagick variant {:?} failed for {}: {}", prefix, path.display(), e);
                    last_err = Some(e);
                }
            }
        }

        Err(Error::Extraction(format!(
            "ImageMagick convert not available or failed: {}",
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    fn name(&self) -> &'static str {
        "imagemagick"
    }
}

/// Tries `primary`, then `secondary` if the first one fails
pub struct FallbackHasher {
    primary: Box<dyn FingerprintExtractor>,
    secondary: Box<dyn FingerprintExtractor>,
}

impl FallbackHasher {
    pub fn new(
        primary: Box<dyn FingerprintExtractor>,
        secondary: Box<dyn FingerprintExtractor>,
    ) -> Self {
        Self { primary, secondary }
    }
}

impl FingerprintExtractor for FallbackHasher {
    fn fingerprint(&self, path: &Path) -> Result<PHash> {
        match self.primary.fingerprint(path) {
            Ok(hash) => Ok(hash),
            Err(primary_err) => {
                debug!(
                    "{} failed for {} ({}), trying {}",
                    self.primary.name(),
                    path.display(),
                    primary_err,
                    self.secondary.name()
                );
                self.secondary.fingerprint(path).map_err(|secondary_err| {
                    Error::Extraction(format!(
                        "{}: {}; {}: {}",
                        self.primary.name(),
                        primary_err,
                        self.secondary.name(),
                        secondary_err
                    ))
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// Build the extractor for a configured backend
pub fn extractor_for(backend: HashBackend) -> Box<dyn FingerprintExtractor> {
    match backend {
        HashBackend::Auto => Box::new(FallbackHasher::new(
            Box::new(ImageCrateHasher),
            Box::new(ImageMagickHasher::default()),
        )),
        HashBackend::Image => Box::new(ImageCrateHasher),
        HashBackend::ImageMagick => Box::new(ImageMagickHasher::default()),
    }
}
