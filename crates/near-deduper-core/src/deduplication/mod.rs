//! Grouping of fingerprinted images into duplicate sets.
//!
//! The near-duplicate path runs in three steps:
//! - `SimilarityGrouper` compares every pair of valid fingerprints and merges pairs
//!   within the threshold into a `DisjointSet`
//! - the resulting `Partition` lists connected components
//! - `resolve_groups` drops singletons and picks the image to keep in each group
//!
//! `exact` groups byte-identical files by content digest instead.

pub mod disjoint_set;
pub mod exact;
pub mod grouping;
pub mod resolve;

pub use disjoint_set::DisjointSet;
pub use exact::{find_exact_duplicates, group_by_digest};
pub use grouping::{Partition, SimilarityGrouper};
pub use resolve::resolve_groups;

use crate::config::Threshold;
use crate::types::{DuplicateGroup, HashedImage};

/// Group `items` by fingerprint similarity and resolve keep/delete per group
pub fn find_near_duplicates(items: &[HashedImage], threshold: Threshold) -> Vec<DuplicateGroup> {
    let partition = SimilarityGrouper::new(threshold).partition(items);
    resolve_groups(items, &partition)
}
