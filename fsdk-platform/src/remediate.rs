//! Read-only attribute remediation before deleting an SDK directory.
//!
//! Git checkouts on Windows mark pack files read-only, which makes a plain
//! recursive delete fail with access denied. Clearing the flag first is the
//! only fix applied; files held open by another process still fail the delete.

use std::fs::{self, Permissions};
use std::io;
use std::path::Path;

use fsdk_core::{FsdkError, Result};
use walkdir::WalkDir;

/// What a remediation pass touched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemediationReport {
    pub visited: usize,
    pub cleared: usize,
}

/// Recursively clear read-only attributes under `root`.
///
/// Best effort: entries that disappear or cannot be changed are logged and
/// skipped, the following delete reports whatever is still in the way.
pub fn clear_readonly(root: &Path) -> Result<RemediationReport> {
    let mut report = RemediationReport::default();

    if !root.exists() {
        return Ok(report);
    }

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.path_is_symlink() {
            continue;
        }
        report.visited += 1;

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "could not stat entry");
                continue;
            }
        };

        let mut permissions = metadata.permissions();
        if !permissions.readonly() {
            continue;
        }

        make_writable(&mut permissions);
        match fs::set_permissions(entry.path(), permissions) {
            Ok(()) => report.cleared += 1,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "could not clear read-only flag");
            }
        }
    }

    tracing::debug!(root = %root.display(), visited = report.visited, cleared = report.cleared, "remediation finished");
    Ok(report)
}

/// Recursively delete `dir`. A missing directory is not an error.
pub fn remove_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(FsdkError::DirectoryLocked {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(unix)]
fn make_writable(permissions: &mut Permissions) {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(permissions.mode() | 0o200);
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(permissions: &mut Permissions) {
    permissions.set_readonly(false);
}
