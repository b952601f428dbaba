//! Core functionality for finding and managing near-duplicate JPEG images.
//!
//! This library provides the components of a deduplication run:
//! - File discovery (JPEG only, sorted by path)
//! - 8x8 average-hash fingerprinting, in parallel
//! - Similarity grouping with a disjoint-set over Hamming distance
//! - Deterministic keep/delete resolution, manifests and gated deletion

// -- External Dependencies --

use log::info;

// -- Standard Library --
use std::path::PathBuf;

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use error::{Error, Result};
pub use types::*;

// -- Public Modules --
pub mod action;
pub mod config;
pub mod deduplication;
pub mod discovery;
pub mod logging;
pub mod manifest;
pub mod processing;
pub mod safety;
pub mod types;

// -- Test Modules --
#[cfg(test)]
pub mod test_utils;

use action::RemovalRecord;
use deduplication::find_exact_duplicates;
use processing::{extractor_for, hash_images, BatchConfig, FingerprintExtractor};

/// Build a report from already-fingerprinted items.
///
/// This is the whole clustering core: no I/O, no logging side effects beyond `debug!`.
pub fn build_report(items: &[HashedImage], mode: SimilarityMode, threshold: Threshold) -> RunReport {
    let groups = deduplication::find_near_duplicates(items, threshold);
    let failures = items.iter().filter_map(HashedImage::failure).collect();

    RunReport::new(
        MatchCriterion::Perceptual { mode, threshold },
        items.len(),
        groups,
        failures,
    )
}

/// Outcome of the deletion step
#[derive(Debug)]
pub enum DeletionOutcome {
    /// `delete` was not requested
    NotRequested,

    /// `delete` was requested but not confirmed; nothing was touched
    Unconfirmed,

    /// Deletion ran; the removal manifest is at `manifest`
    Executed {
        records: Vec<RemovalRecord>,
        removed: usize,
        manifest: PathBuf,
    },
}

/// Main entry point for a deduplication run
pub struct NearDeduper {
    config: Config,
    threshold: Threshold,
    extractor: Box<dyn FingerprintExtractor>,
    safety_manager: safety::SafetyManager,
}

impl NearDeduper {
    /// Create a deduper using the extractor named by `config.backend`.
    ///
    /// Invalid configuration is rejected here, before any file is touched.
    pub fn new(config: Config) -> Result<Self> {
        let extractor = extractor_for(config.backend);
        Self::with_extractor(config, extractor)
    }

    /// Create a deduper with a caller-supplied fingerprint backend
    pub fn with_extractor(config: Config, extractor: Box<dyn FingerprintExtractor>) -> Result<Self> {
        config.validate()?;
        let threshold = config.effective_threshold()?;
        let safety_manager = safety::SafetyManager::new(&config);

        Ok(Self {
            config,
            threshold,
            extractor,
            safety_manager,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Discover all JPEGs under the configured root
    pub fn discover_images(&self) -> Result<Vec<ImageFile>> {
        discovery::discover_images(&self.config.root, &self.config)
    }

    /// Fingerprint the given files
    pub fn hash_images(&self, files: &[ImageFile]) -> Result<Vec<HashedImage>> {
        hash_images(files, self.extractor.as_ref(), &BatchConfig::from_config(&self.config))
    }

    /// Discover, hash and group near-duplicates
    pub fn scan(&self) -> Result<RunReport> {
        info!("Discovering images under {}", self.config.root.display());
        let files = self.discover_images()?;
        info!("Found {} images", files.len());

        let items = self.hash_images(&files)?;

        info!("Comparing hashes (threshold={})", self.threshold);
        let report = build_report(&items, self.config.mode, self.threshold);
        info!(
            "Groups found: {}, proposed deletions: {} (keeping {})",
            report.group_count, report.delete_count, report.keep_count
        );

        Ok(report)
    }

    /// Discover and group byte-identical files
    pub fn scan_exact(&self) -> Result<RunReport> {
        let files = self.discover_images()?;
        let (groups, failures) =
            find_exact_duplicates(&files, &BatchConfig::from_config(&self.config))?;

        Ok(RunReport::new(MatchCriterion::Exact, files.len(), groups, failures))
    }

    /// Write the review manifest into the configured manifest directory
    pub fn write_review_manifest(&self, report: &RunReport) -> Result<PathBuf> {
        manifest::save_review_manifest(&self.config.manifest_dir, report)
    }

    /// Delete proposed duplicates if, and only if, deletion was requested and confirmed
    pub fn apply(&self, report: &RunReport) -> Result<DeletionOutcome> {
        if !self.config.delete {
            return Ok(DeletionOutcome::NotRequested);
        }
        if !self.config.confirm {
            info!("Delete requested without confirmation; skipping deletion");
            return Ok(DeletionOutcome::Unconfirmed);
        }

        let records = action::delete_duplicates(&report.groups, &self.safety_manager)?;
        let removed = action::removed_count(&records);
        let manifest =
            manifest::save_removal_manifest(&self.config.manifest_dir, &report.criterion, &records)?;
        info!("Deleted {} near-duplicate(s)", removed);

        Ok(DeletionOutcome::Executed {
            records,
            removed,
            manifest,
        })
    }
}
