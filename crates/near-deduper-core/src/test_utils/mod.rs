//! JPEG fixtures generated on the fly for unit tests.

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Dark on the left, bright on the right
pub fn horizontal_gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1)) as u8;
        Rgb([v, v, v])
    })
}

/// Dark at the top, bright at the bottom
pub fn vertical_gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        let v = (y * 255 / (height - 1)) as u8;
        Rgb([v, v, v])
    })
}

/// Save `img` as a JPEG under `dir`, creating parent folders
pub fn write_jpeg(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    img.save_with_format(&path, image::ImageFormat::Jpeg).unwrap();
    path
}

/// A file with a JPEG extension that no decoder will accept
pub fn write_corrupt_jpeg(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"DUMMY IMAGE DATA").unwrap();
    path
}
