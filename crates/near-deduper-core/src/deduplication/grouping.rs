use log::debug;
use std::collections::HashMap;

use crate::config::Threshold;
use crate::deduplication::disjoint_set::DisjointSet;
use crate::processing::PHash;
use crate::types::HashedImage;

/// Final partition of a run's items into similarity components.
///
/// Items whose fingerprint failed have no component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    roots: Vec<Option<usize>>,
    merges: usize,
}

impl Partition {
    /// Number of items the partition was built over, failed ones included
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Representative of item `index`, or `None` for a failed item
    pub fn root(&self, index: usize) -> Option<usize> {
        self.roots.get(index).copied().flatten()
    }

    /// Whether two items ended up in the same component
    pub fn same_component(&self, a: usize, b: usize) -> bool {
        match (self.root(a), self.root(b)) {
            (Some(ra), Some(rb)) => ra == rb,
            _ => false,
        }
    }

    /// Number of within-threshold pairs that merged two components
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// Member indices of every component, singletons included.
    ///
    /// Components are ordered by their smallest member and members ascend.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();

        for (index, root) in self.roots.iter().enumerate() {
            let Some(root) = root else { continue };
            let slot = *slot_of_root.entry(*root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(index);
        }

        components
    }
}

/// Clusters items whose fingerprints lie within a Hamming threshold of each other.
///
/// Every pair of valid items is compared (O(n²)); matches are merged transitively, so
/// `a ~ b` and `b ~ c` put `a` and `c` together even when `a` and `c` are far apart.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityGrouper {
    threshold: Threshold,
}

impl SimilarityGrouper {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Partition `items`, using each item's position in the slice as its index
    pub fn partition(&self, items: &[HashedImage]) -> Partition {
        let hashes: Vec<Option<PHash>> = items.iter().map(HashedImage::phash).collect();
        self.partition_hashes(&hashes)
    }

    /// Partition raw fingerprints; `None` marks an item that failed extraction
    pub fn partition_hashes(&self, hashes: &[Option<PHash>]) -> Partition {
        let threshold = self.threshold.value();
        let mut sets = DisjointSet::new(hashes.len());

        let valid: Vec<(usize, PHash)> = hashes
            .iter()
            .enumerate()
            .filter_map(|(index, hash)| hash.map(|h| (index, h)))
            .collect();

        debug!(
            "Comparing {} fingerprint(s) pairwise (threshold={})",
            valid.len(),
            threshold
        );

        let mut pairs = 0usize;
        let mut merges = 0usize;
        for (pos, &(i, hi)) in valid.iter().enumerate() {
            for &(j, hj) in &valid[pos + 1..] {
                if hi.distance(&hj) <= threshold {
                    pairs += 1;
                    if sets.union(i, j) {
                        merges += 1;
                    }
                }
            }
        }

        debug!(
            "{} similar pair(s) found, {} merge(s) performed",
            pairs, merges
        );

        let roots = hashes
            .iter()
            .enumerate()
            .map(|(index, hash)| hash.map(|_| sets.find(index)))
            .collect();

        Partition { roots, merges }
    }
}
