//! Scoped change of the process working directory

use crate::error::PrepareError;
use std::path::{Path, PathBuf};

/// Changes the working directory and restores the previous one on drop
///
/// The working directory is process-wide state, so restoring it must not
/// depend on which path the caller leaves by.
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct WorkingDirGuard {
    previous: PathBuf,
}

impl WorkingDirGuard {
    pub fn enter(dir: &Path) -> Result<Self, PrepareError> {
        let previous = std::env::current_dir().map_err(|e| PrepareError::io(".", e))?;
        std::env::set_current_dir(dir).map_err(|e| PrepareError::io(dir, e))?;
        log::debug!("Entered {}", dir.display());
        Ok(Self { previous })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            log::error!(
                "Failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
