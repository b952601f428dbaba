//! Plain-text review and removal manifests.
//!
//! Writers take any `io::Write` and an explicit timestamp; the `save_*` helpers pick
//! the timestamped file name and write under a directory.

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::action::RemovalRecord;
use crate::error::Result;
use crate::types::{MatchCriterion, RunReport};

/// Failures listed individually before the rest are summarised
pub const MAX_LISTED_FAILURES: usize = 10;

fn file_stem(criterion: &MatchCriterion) -> &'static str {
    match criterion {
        MatchCriterion::Perceptual { .. } => "near-duplicate",
        MatchCriterion::Exact => "duplicate",
    }
}

fn write_criterion<W: Write>(out: &mut W, criterion: &MatchCriterion) -> io::Result<()> {
    match criterion {
        MatchCriterion::Perceptual { mode, threshold } => {
            writeln!(out, "Mode: {}  Threshold: {}", mode, threshold)
        }
        MatchCriterion::Exact => writeln!(out, "Criterion: exact (BLAKE3)"),
    }
}

/// Write the review manifest: every group with its proposed keep and deletions
pub fn write_review_manifest<W: Write>(
    out: &mut W,
    report: &RunReport,
    generated: DateTime<Local>,
) -> io::Result<()> {
    match report.criterion {
        MatchCriterion::Perceptual { .. } => {
            writeln!(out, "Near-duplicate review manifest (8x8 aHash)")?
        }
        MatchCriterion::Exact => writeln!(out, "Duplicate review manifest (exact BLAKE3 matches)")?,
    }
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    write_criterion(out, &report.criterion)?;

    if !report.failures.is_empty() {
        writeln!(out, "Hash failures: {}", report.failures.len())?;
        for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
            writeln!(out, "  FAIL {}: {}", failure.path.display(), failure.error)?;
        }
        if report.failures.len() > MAX_LISTED_FAILURES {
            writeln!(
                out,
                "  … {} more failures omitted",
                report.failures.len() - MAX_LISTED_FAILURES
            )?;
        }
    }
    writeln!(out)?;

    for (i, group) in report.groups.iter().enumerate() {
        writeln!(out, "Group {} (size={}):", i + 1, group.size())?;
        writeln!(out, "  KEEP: {}", group.keep.display())?;
        for candidate in &group.delete_candidates {
            writeln!(out, "  DEL?: {}", candidate.display())?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Write the removal manifest: what was actually deleted, and what failed
pub fn write_removal_manifest<W: Write>(
    out: &mut W,
    criterion: &MatchCriterion,
    records: &[RemovalRecord],
    generated: DateTime<Local>,
) -> io::Result<()> {
    match criterion {
        MatchCriterion::Perceptual { .. } => writeln!(out, "Near-duplicate removals (executed)")?,
        MatchCriterion::Exact => writeln!(out, "Duplicate removals (executed)")?,
    }
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    write_criterion(out, criterion)?;
    writeln!(out)?;

    for (i, record) in records.iter().enumerate() {
        writeln!(out, "Group {} (size={}):", i + 1, record.size)?;
        writeln!(out, "  KEEP: {}", record.keep.display())?;
        for result in &record.results {
            if result.success {
                writeln!(out, "  DEL : {}", result.duplicate_path.display())?;
            } else {
                writeln!(
                    out,
                    "  FAIL: {} ({})",
                    result.duplicate_path.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                )?;
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

fn manifest_path(dir: &Path, stem: &str, kind: &str, generated: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{}-{}-{}.txt",
        stem,
        kind,
        generated.format("%Y%m%d-%H%M%S")
    ))
}

/// Save the review manifest under `dir`, returning its path
pub fn save_review_manifest(dir: &Path, report: &RunReport) -> Result<PathBuf> {
    let generated = Local::now();
    std::fs::create_dir_all(dir)?;
    let path = manifest_path(dir, file_stem(&report.criterion), "review", generated);

    let mut out = BufWriter::new(File::create(&path)?);
    write_review_manifest(&mut out, report, generated)?;
    out.flush()?;

    Ok(path)
}

/// Save the removal manifest under `dir`, returning its path
pub fn save_removal_manifest(
    dir: &Path,
    criterion: &MatchCriterion,
    records: &[RemovalRecord],
) -> Result<PathBuf> {
    let generated = Local::now();
    std::fs::create_dir_all(dir)?;
    let path = manifest_path(dir, file_stem(criterion), "removals", generated);

    let mut out = BufWriter::new(File::create(&path)?);
    write_removal_manifest(&mut out, criterion, records, generated)?;
    out.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    use crate::config::{SimilarityMode, Threshold};
    use crate::types::{ActionResult, ActionType, DuplicateGroup, HashFailure};

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 6).unwrap()
    }

    fn perceptual() -> MatchCriterion {
        MatchCriterion::Perceptual {
            mode: SimilarityMode::Medium,
            threshold: Threshold::new(10).unwrap(),
        }
    }

    #[test]
    fn test_review_manifest_layout() {
        let groups = vec![DuplicateGroup::from_members(vec![
            PathBuf::from("images/b.jpg"),
            PathBuf::from("images/a.jpg"),
        ])
        .unwrap()];
        let failures = vec![HashFailure {
            path: PathBuf::from("images/bad.jpg"),
            error: "decode error".to_string(),
        }];
        let report = RunReport::new(perceptual(), 3, groups, failures);

        let mut out = Vec::new();
        write_review_manifest(&mut out, &report, fixed_time()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "Near-duplicate review manifest (8x8 aHash)\n\
                        Generated: 2024-03-09 14:05:06\n\
                        Mode: medium  Threshold: 10\n\
                        Hash failures: 1\n\
                        \x20 FAIL images/bad.jpg: decode error\n\
                        \n\
                        Group 1 (size=2):\n\
                        \x20 KEEP: images/a.jpg\n\
                        \x20 DEL?: images/b.jpg\n\
                        \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_review_manifest_truncates_failures() {
        let failures: Vec<HashFailure> = (0..13)
            .map(|i| HashFailure {
                path: PathBuf::from(format!("f{:02}.jpg", i)),
                error: "bad".to_string(),
            })
            .collect();
        let report = RunReport::new(MatchCriterion::Exact, 13, Vec::new(), failures);

        let mut out = Vec::new();
        write_review_manifest(&mut out, &report, fixed_time()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Criterion: exact (BLAKE3)"));
        assert_eq!(text.matches("  FAIL ").count(), MAX_LISTED_FAILURES);
        assert!(text.contains("  … 3 more failures omitted"));
    }

    #[test]
    fn test_removal_manifest_layout() {
        let records = vec![RemovalRecord {
            keep: PathBuf::from("a.jpg"),
            size: 3,
            results: vec![
                ActionResult {
                    action_type: ActionType::Delete,
                    duplicate_path: PathBuf::from("b.jpg"),
                    original_path: PathBuf::from("a.jpg"),
                    success: true,
                    error: None,
                },
                ActionResult {
                    action_type: ActionType::Delete,
                    duplicate_path: PathBuf::from("c.jpg"),
                    original_path: PathBuf::from("a.jpg"),
                    success: false,
                    error: Some("permission denied".to_string()),
                },
            ],
        }];

        let mut out = Vec::new();
        write_removal_manifest(&mut out, &perceptual(), &records, fixed_time()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Near-duplicate removals (executed)\n"));
        assert!(text.contains("Group 1 (size=3):\n  KEEP: a.jpg\n  DEL : b.jpg\n  FAIL: c.jpg (permission denied)\n"));
    }

    #[test]
    fn test_save_review_manifest_names_file() {
        let dir = tempdir().unwrap();
        let report = RunReport::new(perceptual(), 0, Vec::new(), Vec::new());

        let path = save_review_manifest(dir.path(), &report).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(name.starts_with("near-duplicate-review-"));
        assert!(name.ends_with(".txt"));
        assert!(path.exists());
    }
}
