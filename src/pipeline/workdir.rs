use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Scoped staging directory
///
/// Creates a fresh directory on construction (removing any stale one left by
/// a previous crashed run) and removes it again when dropped, so every exit
/// path of the pipeline - including error returns - cleans up. Removal
/// failure on drop is warned, never escalated.
#[derive(Debug)]
pub struct ScopedWorkdir {
    path: PathBuf,
}

impl ScopedWorkdir {
    /// Create a fresh working directory at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if a stale directory cannot be removed or the new
    /// one cannot be created.
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            fs::remove_dir_all(path).with_context(|| {
                format!("failed to remove stale working directory {}", path.display())
            })?;
        }
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create working directory {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the working directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedWorkdir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(err) = fs::remove_dir_all(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to clean up working directory"
            );
        }
    }
}
