use log::info;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::logging::log_hash_error;
use crate::processing::{compute_cryptographic, process_in_pool, BatchConfig};
use crate::types::{sort_groups, DuplicateGroup, HashFailure, ImageFile};

/// Group paths whose contents hash to the same digest
pub fn group_by_digest(entries: Vec<(PathBuf, blake3::Hash)>) -> Vec<DuplicateGroup> {
    let mut by_digest: HashMap<blake3::Hash, Vec<PathBuf>> = HashMap::new();
    for (path, digest) in entries {
        by_digest.entry(digest).or_default().push(path);
    }

    let mut groups: Vec<DuplicateGroup> = by_digest
        .into_values()
        .filter_map(DuplicateGroup::from_members)
        .collect();

    sort_groups(&mut groups);
    groups
}

/// Find byte-identical files. Unreadable files are returned as failures.
pub fn find_exact_duplicates(
    files: &[ImageFile],
    config: &BatchConfig,
) -> Result<(Vec<DuplicateGroup>, Vec<HashFailure>)> {
    info!("Scanning {} image(s) for exact duplicates", files.len());

    let digests = process_in_pool(files, config, "Computing content digests...", |_, file| {
        compute_cryptographic(&file.path).map_err(|e| {
            log_hash_error(&file.path, &e);
            e.to_string()
        })
    })?;

    let mut entries = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    for (file, digest) in files.iter().zip(digests) {
        match digest {
            Ok(digest) => entries.push((file.path.clone(), digest)),
            Err(error) => failures.push(HashFailure {
                path: file.path.clone(),
                error,
            }),
        }
    }

    let groups = group_by_digest(entries);
    info!("Groups with duplicates: {}", groups.len());
    Ok((groups, failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;
    use tempfile::tempdir;

    use crate::types::ImageFormat;

    fn image_file(path: PathBuf) -> ImageFile {
        ImageFile {
            path,
            size: 0,
            last_modified: SystemTime::UNIX_EPOCH,
            format: ImageFormat::Jpeg,
        }
    }

    #[test]
    fn test_group_by_digest() {
        let one = blake3::hash(b"one");
        let two = blake3::hash(b"two");
        let groups = group_by_digest(vec![
            (PathBuf::from("c.jpg"), one),
            (PathBuf::from("b.jpg"), two),
            (PathBuf::from("a.jpg"), one),
        ]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].keep, PathBuf::from("a.jpg"));
        assert_eq!(groups[0].delete_candidates, vec![PathBuf::from("c.jpg")]);
    }

    #[test]
    fn test_find_exact_duplicates_on_disk() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        let c = dir.path().join("c.jpg");
        std::fs::write(&a, b"same bytes").unwrap();
        std::fs::write(&b, b"same bytes").unwrap();
        std::fs::write(&c, b"other bytes").unwrap();
        let missing = dir.path().join("gone.jpg");

        let files: Vec<ImageFile> = vec![a.clone(), b.clone(), c, missing.clone()]
            .into_iter()
            .map(image_file)
            .collect();

        let (groups, failures) = find_exact_duplicates(&files, &BatchConfig::default()).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].keep, a);
        assert_eq!(groups[0].delete_candidates, vec![b]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, missing);
    }
}
