use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::log_file_error;
use crate::types::{path_order, ImageFile, ImageFormat};

/// Discover JPEG images under `root`, sorted by byte-wise path order.
///
/// The sort fixes each file's index for the rest of the run.
pub fn discover_images(root: &Path, config: &Config) -> Result<Vec<ImageFile>> {
    // Check if directory exists
    if !root.exists() {
        return Err(Error::FileNotFound(root.to_path_buf()));
    }

    let max_depth = config.max_depth.unwrap_or(usize::MAX);

    let mut image_files = Vec::new();

    for entry in WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                if let Some(path) = err.path() {
                    log_file_error(path, "walk", &err);
                }
                None
            }
        })
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();

        if !is_image_path(path) {
            continue;
        }

        match get_file_metadata(path) {
            Ok((size, last_modified)) => image_files.push(ImageFile {
                path: path.to_path_buf(),
                size,
                last_modified,
                format: ImageFormat::Jpeg,
            }),
            Err(e) => {
                // Log error but continue with other files
                log_file_error(path, "metadata", &e);
            }
        }
    }

    image_files.sort_by(|a, b| path_order(&a.path, &b.path));
    Ok(image_files)
}

/// Get image format from file extension
fn get_image_format(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(ImageFormat::from_extension)
}

/// Get file size and modification time
fn get_file_metadata(path: &Path) -> io::Result<(u64, std::time::SystemTime)> {
    let metadata = fs::metadata(path)?;
    Ok((metadata.len(), metadata.modified()?))
}

/// Returns if the given path has a JPEG extension
pub fn is_image_path(path: &Path) -> bool {
    match get_image_format(path) {
        Some(format) => format.is_supported(),
        None => false,
    }
}

// -- Tests --
