use std::path::PathBuf;

use crate::error::Result;
use crate::logging::{log_file_error, log_fs_modification};
use crate::safety::SafetyManager;
use crate::types::{ActionResult, ActionType, DuplicateGroup};

/// What happened to one group during deletion
#[derive(Debug, Clone)]
pub struct RemovalRecord {
    pub keep: PathBuf,

    /// Group size, kept file included
    pub size: usize,

    pub results: Vec<ActionResult>,
}

impl RemovalRecord {
    pub fn removed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}

/// Total files removed across records
pub fn removed_count(records: &[RemovalRecord]) -> usize {
    records.iter().map(RemovalRecord::removed).sum()
}

/// Delete every delete-candidate, keeping one file per group.
///
/// Fails up front if deletion is not authorised. Individual file errors are recorded
/// on the returned records and never stop the run.
pub fn delete_duplicates(
    groups: &[DuplicateGroup],
    safety: &SafetyManager,
) -> Result<Vec<RemovalRecord>> {
    safety.authorize_deletion()?;

    let records = groups
        .iter()
        .map(|group| {
            let results = group
                .delete_candidates
                .iter()
                .map(|candidate| {
                    let mut result = ActionResult {
                        action_type: ActionType::Delete,
                        duplicate_path: candidate.clone(),
                        original_path: group.keep.clone(),
                        success: false,
                        error: None,
                    };

                    if let Err(e) = safety.check_candidate(&group.keep, candidate) {
                        log_file_error(candidate, "delete", &e);
                        result.action_type = ActionType::Skip;
                        result.error = Some(e.to_string());
                        return result;
                    }

                    match std::fs::remove_file(candidate) {
                        Ok(()) => {
                            let details = format!("near-duplicate of {}", group.keep.display());
                            log_fs_modification("delete", candidate, Some(&details));
                            result.success = true;
                        }
                        Err(e) => {
                            log_file_error(candidate, "delete", &e);
                            result.error = Some(e.to_string());
                        }
                    }
                    result
                })
                .collect();

            RemovalRecord {
                keep: group.keep.clone(),
                size: group.size(),
                results,
            }
        })
        .collect();

    Ok(records)
}
