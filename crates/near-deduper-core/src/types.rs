use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::{SimilarityMode, Threshold};
use crate::processing::PHash;

/// Image formats recognised during discovery
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            other => Self::Other(other.to_string()),
        }
    }

    /// Only JPEG files take part in deduplication
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

/// Representation of an image file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    /// Full path to the image file
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modified timestamp
    pub last_modified: SystemTime,

    /// Image format
    pub format: ImageFormat,
}

/// Byte-wise lexicographic order over paths.
///
/// `PathBuf`'s own `Ord` compares component by component, which disagrees with plain
/// string order for names like `a-b` vs `a/b`. Keep selection and manifest order use
/// this instead.
pub fn path_order(a: &Path, b: &Path) -> Ordering {
    a.as_os_str().cmp(b.as_os_str())
}

/// Outcome of fingerprinting a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOutcome {
    Hashed(PHash),
    Failed(String),
}

/// One input item: a file, its position in the run, and its fingerprint (or failure)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedImage {
    /// Position in the sorted file list
    pub index: usize,

    pub path: PathBuf,

    pub outcome: HashOutcome,
}

impl HashedImage {
    pub fn hashed(index: usize, path: impl Into<PathBuf>, phash: PHash) -> Self {
        Self {
            index,
            path: path.into(),
            outcome: HashOutcome::Hashed(phash),
        }
    }

    pub fn failed(index: usize, path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            index,
            path: path.into(),
            outcome: HashOutcome::Failed(error.into()),
        }
    }

    /// The fingerprint, if extraction succeeded
    pub fn phash(&self) -> Option<PHash> {
        match self.outcome {
            HashOutcome::Hashed(phash) => Some(phash),
            HashOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<HashFailure> {
        match &self.outcome {
            HashOutcome::Hashed(_) => None,
            HashOutcome::Failed(error) => Some(HashFailure {
                path: self.path.clone(),
                error: error.clone(),
            }),
        }
    }
}

/// A file whose fingerprint could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFailure {
    pub path: PathBuf,
    pub error: String,
}

/// A set of images judged to be duplicates of each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The image to keep (lexicographically first path)
    pub keep: PathBuf,

    /// Everything else in the group, in path order
    pub delete_candidates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Build a group from its members. Returns `None` for fewer than two members,
    /// since a singleton has nothing to deduplicate.
    pub fn from_members(mut members: Vec<PathBuf>) -> Option<Self> {
        if members.len() < 2 {
            return None;
        }
        members.sort_by(|a, b| path_order(a, b));
        let keep = members.remove(0);
        Some(Self {
            keep,
            delete_candidates: members,
        })
    }

    pub fn size(&self) -> usize {
        1 + self.delete_candidates.len()
    }

    /// All members in path order, keep first
    pub fn members(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.keep.as_path()).chain(self.delete_candidates.iter().map(|p| p.as_path()))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.members().any(|member| member == path)
    }
}

/// Order groups for reporting: smaller groups first, then by member paths
pub fn sort_groups(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        a.size().cmp(&b.size()).then_with(|| {
            a.members()
                .map(Path::as_os_str)
                .cmp(b.members().map(Path::as_os_str))
        })
    });
}

/// How membership in a group was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MatchCriterion {
    /// 8x8 average hash within a Hamming threshold
    Perceptual {
        mode: SimilarityMode,
        threshold: Threshold,
    },

    /// Identical file contents (BLAKE3 digest)
    Exact,
}

/// Summary of one deduplication run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub criterion: MatchCriterion,

    /// Number of files considered, including failures
    pub files_scanned: usize,

    pub groups: Vec<DuplicateGroup>,

    pub failures: Vec<HashFailure>,

    pub group_count: usize,

    /// One kept file per group
    pub keep_count: usize,

    pub delete_count: usize,
}

impl RunReport {
    pub fn new(
        criterion: MatchCriterion,
        files_scanned: usize,
        groups: Vec<DuplicateGroup>,
        failures: Vec<HashFailure>,
    ) -> Self {
        let delete_count = groups.iter().map(|g| g.delete_candidates.len()).sum();
        Self {
            criterion,
            files_scanned,
            group_count: groups.len(),
            keep_count: groups.len(),
            delete_count,
            groups,
            failures,
        }
    }

    /// Threshold used, for perceptual runs
    pub fn threshold(&self) -> Option<Threshold> {
        match self.criterion {
            MatchCriterion::Perceptual { threshold, .. } => Some(threshold),
            MatchCriterion::Exact => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Types of actions that can be performed on duplicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    /// Delete the file
    Delete,

    /// Left in place because deletion was not authorised or a check failed
    Skip,
}

/// Result of a deduplication action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    /// Type of action performed
    pub action_type: ActionType,

    /// Path of the duplicate file
    pub duplicate_path: PathBuf,

    /// Path of the kept file
    pub original_path: PathBuf,

    /// Whether the action was successful
    pub success: bool,

    /// Optional error message if action failed
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("JPG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert!(!ImageFormat::from_extension("png").is_supported());
    }

    #[test]
    fn test_group_requires_two_members() {
        assert!(DuplicateGroup::from_members(vec![]).is_none());
        assert!(DuplicateGroup::from_members(vec![PathBuf::from("a.jpg")]).is_none());
    }

    #[test]
    fn test_group_keeps_lexicographically_first() {
        let group = DuplicateGroup::from_members(vec![
            PathBuf::from("b/2.jpg"),
            PathBuf::from("a/9.jpg"),
            PathBuf::from("b/1.jpg"),
        ])
        .unwrap();

        assert_eq!(group.keep, PathBuf::from("a/9.jpg"));
        assert_eq!(
            group.delete_candidates,
            vec![PathBuf::from("b/1.jpg"), PathBuf::from("b/2.jpg")]
        );
        assert_eq!(group.size(), 3);
    }

    #[test]
    fn test_path_order_is_bytewise() {
        // '-' (0x2d) sorts before '/' (0x2f) as bytes
        assert_eq!(
            path_order(Path::new("a-b/x.jpg"), Path::new("a/b.jpg")),
            Ordering::Less
        );
    }

    #[test]
    fn test_sort_groups_by_size_then_members() {
        let big = DuplicateGroup::from_members(vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()]).unwrap();
        let late = DuplicateGroup::from_members(vec!["x.jpg".into(), "y.jpg".into()]).unwrap();
        let early = DuplicateGroup::from_members(vec!["m.jpg".into(), "n.jpg".into()]).unwrap();

        let mut groups = vec![big.clone(), late.clone(), early.clone()];
        sort_groups(&mut groups);
        assert_eq!(groups, vec![early, late, big]);
    }

    #[test]
    fn test_report_totals() {
        let groups = vec![
            DuplicateGroup::from_members(vec!["a.jpg".into(), "b.jpg".into()]).unwrap(),
            DuplicateGroup::from_members(vec!["c.jpg".into(), "d.jpg".into(), "e.jpg".into()]).unwrap(),
        ];
        let report = RunReport::new(MatchCriterion::Exact, 6, groups, Vec::new());

        assert_eq!(report.group_count, 2);
        assert_eq!(report.keep_count, 2);
        assert_eq!(report.delete_count, 3);
        assert_eq!(report.threshold(), None);
    }
}
