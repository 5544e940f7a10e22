//! File system helpers shared by the installer crates.

use std::fs;
use std::path::Path;

use crate::error::{FsdkError, Result};

/// Check if a file exists in a directory
pub fn has_file(dir: &Path, relative: impl AsRef<Path>) -> bool {
    dir.join(relative).is_file()
}

/// Read a file to a trimmed string, or `None` if it is missing or unreadable.
pub fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Create a directory and all of its parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| FsdkError::filesystem(e, dir, "create directory"))
}

/// Rename `from` to `to`, which must be on the same filesystem.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    tracing::debug!(from = %from.display(), to = %to.display(), "rename");
    fs::rename(from, to).map_err(|e| FsdkError::filesystem(e, to, "move into place"))
}
