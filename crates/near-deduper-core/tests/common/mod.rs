#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use near_deduper_core::{Config, HashBackend};

/// Dark on the left, bright on the right, shifted by `offset`
pub fn horizontal_gradient(offset: u8) -> RgbImage {
    RgbImage::from_fn(96, 64, |x, _| {
        let v = ((x * 200 / 95) as u8).saturating_add(offset);
        Rgb([v, v, v])
    })
}

/// Dark at the top, bright at the bottom
pub fn vertical_gradient() -> RgbImage {
    RgbImage::from_fn(96, 64, |_, y| {
        let v = (y * 255 / 63) as u8;
        Rgb([v, v, v])
    })
}

/// Save `img` as a JPEG, creating parent folders
pub fn write_jpeg(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save_with_format(&path, image::ImageFormat::Jpeg).unwrap();
    path
}

/// Create a file with a JPEG extension and garbage contents
pub fn create_corrupt_jpeg(dir: &Path, name: &str) -> PathBuf {
    let file_path = dir.join(name);
    fs::create_dir_all(file_path.parent().unwrap()).unwrap();
    let mut file = File::create(&file_path).unwrap();
    file.write_all(b"DUMMY IMAGE DATA").unwrap();
    file_path
}

/// A library of photos:
/// - `a/original.jpg`, `b/copy.jpg`: identical
/// - `c/brighter.jpg`: same scene, brightened
/// - `d/other.jpg`: unrelated
/// - `e/broken.jpg`: undecodable
/// - `notes.txt`: not an image
pub fn create_photo_library(root: &Path) -> Vec<PathBuf> {
    let paths = vec![
        write_jpeg(root, "a/original.jpg", &horizontal_gradient(0)),
        write_jpeg(root, "b/copy.jpg", &horizontal_gradient(0)),
        write_jpeg(root, "c/brighter.jpg", &horizontal_gradient(25)),
        write_jpeg(root, "d/other.jpg", &vertical_gradient()),
        create_corrupt_jpeg(root, "e/broken.jpg"),
    ];
    fs::write(root.join("notes.txt"), b"NOT AN IMAGE").unwrap();
    paths
}

/// Config for tests: image crate backend, no progress bar, manifests in `manifests`
pub fn test_config(root: &Path, manifest_dir: &Path) -> Config {
    let mut config = Config::default();
    config.root = root.to_path_buf();
    config.manifest_dir = manifest_dir.to_path_buf();
    config.backend = HashBackend::Image;
    config.show_progress = false;
    config.threads = 2;
    config
}
