use std::path::Path;

use tempfile::{Builder, TempDir};

use crate::error::{FsdkError, Result};

/// Creates a private temporary directory under the system temp location.
/// The directory is automatically deleted when the `TempDir` object is dropped.
pub fn create_temp_dir(prefix: &str) -> Result<TempDir> {
    Builder::new()
        .prefix(prefix)
        .tempdir()
        .map_err(|e| FsdkError::filesystem(e, std::env::temp_dir(), "create temp directory"))
}

/// Creates a hidden staging directory inside `parent`, so its contents can
/// later be renamed to a sibling path without crossing filesystems.
pub fn create_staging_dir(parent: &Path) -> Result<TempDir> {
    Builder::new()
        .prefix(".flutter-staging-")
        .tempdir_in(parent)
        .map_err(|e| FsdkError::filesystem(e, parent, "create staging directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_dir_is_inside_parent_and_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let staging = create_staging_dir(parent.path()).unwrap();
        let path = staging.path().to_path_buf();

        assert_eq!(path.parent(), Some(parent.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(".flutter-staging-"));

        drop(staging);
        assert!(!path.exists());
    }

    #[test]
    fn test_staging_dir_in_missing_parent_fails() {
        let parent = tempfile::tempdir().unwrap();
        let err = create_staging_dir(&parent.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Filesystem);
    }
}
