//! Parallel fingerprinting of a file list.
//!
//! Each file is hashed independently on a dedicated rayon pool. Results are collected
//! in input order, so an item's index is its position in the sorted file list no matter
//! which worker finished first.

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use std::time::Instant;

use crate::config::Config;
use crate::error::Result;
use crate::logging::log_hash_error;
use crate::processing::extractor::FingerprintExtractor;
use crate::types::{HashedImage, ImageFile};

/// Configuration for batch processing
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum number of threads to use
    pub thread_limit: usize,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            thread_limit: num_cpus::get(),
            show_progress: false,
        }
    }
}

impl BatchConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            thread_limit: config.worker_threads(),
            show_progress: config.show_progress,
        }
    }
}

fn progress_bar(len: usize, show: bool, message: &str) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{eta}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }
    bar.set_message(message.to_string());
    bar
}

/// Run `f` over every element on a bounded pool, keeping input order.
///
/// `f` receives the element's index alongside the element.
pub fn process_in_pool<T, R, F>(
    items: &[T],
    config: &BatchConfig,
    message: &str,
    f: F,
) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_limit.max(1))
        .build()?;

    let bar = progress_bar(items.len(), config.show_progress, message);

    let results = pool.install(|| {
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| {
                let result = f(index, item);
                bar.inc(1);
                result
            })
            .collect::<Vec<_>>()
    });

    bar.finish_and_clear();
    Ok(results)
}

/// Fingerprint every file. Failures are recorded on the item, never propagated.
pub fn hash_images(
    files: &[ImageFile],
    extractor: &dyn FingerprintExtractor,
    config: &BatchConfig,
) -> Result<Vec<HashedImage>> {
    let start = Instant::now();
    info!(
        "Hashing {} image(s) with 8x8 aHash ({} backend, {} threads)",
        files.len(),
        extractor.name(),
        config.thread_limit
    );

    let items = process_in_pool(files, config, "Computing image hashes...", |index, file| {
        match extractor.fingerprint(&file.path) {
            Ok(phash) => HashedImage::hashed(index, file.path.clone(), phash),
            Err(e) => {
                log_hash_error(&file.path, &e);
                HashedImage::failed(index, file.path.clone(), e.to_string())
            }
        }
    })?;

    let failed = items.iter().filter(|item| item.phash().is_none()).count();
    info!(
        "Hashed {} image(s) in {:.2?} ({} failed)",
        items.len(),
        start.elapsed(),
        failed
    );

    Ok(items)
}
