use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};

/// Guards every destructive step of a run
#[derive(Debug, Clone)]
pub struct SafetyManager {
    delete: bool,
    confirm: bool,
}

impl SafetyManager {
    /// Create a new SafetyManager with the provided configuration
    pub fn new(config: &Config) -> Self {
        Self {
            delete: config.delete,
            confirm: config.confirm,
        }
    }

    /// Deletion needs both the delete flag and an explicit confirmation
    pub fn authorize_deletion(&self) -> Result<()> {
        match (self.delete, self.confirm) {
            (true, true) => Ok(()),
            (true, false) => Err(Error::SafetyCheck(
                "deletion requested without confirmation".to_string(),
            )),
            (false, _) => Err(Error::SafetyCheck("deletion not requested".to_string())),
        }
    }

    /// A candidate may only go if it is not the kept file and the kept file still exists
    pub fn check_candidate(&self, keep: &Path, candidate: &Path) -> Result<()> {
        if keep == candidate {
            return Err(Error::SafetyCheck(format!(
                "refusing to delete the kept file {}",
                keep.display()
            )));
        }

        if !keep.is_file() {
            return Err(Error::SafetyCheck(format!(
                "kept file {} is missing",
                keep.display()
            )));
        }

        Ok(())
    }
}
