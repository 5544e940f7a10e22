//! Decides what a run has to do.

use std::fmt;

use crate::local::LocalSdk;

/// What the installer will do to the install directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Installed version already matches the latest release.
    Skip { version: String },
    /// Valid SDK at a different version; replace it.
    Upgrade { from: String, to: String },
    /// Nothing usable on disk. `replace_existing` is set when a directory is
    /// in the way and has to be removed first.
    FreshInstall { to: String, replace_existing: bool },
}

impl Action {
    pub fn mutates_disk(&self) -> bool {
        !matches!(self, Action::Skip { .. })
    }

    /// Version the install directory holds once this action has run.
    pub fn target_version(&self) -> &str {
        match self {
            Action::Skip { version } => version,
            Action::Upgrade { to, .. } | Action::FreshInstall { to, .. } => to,
        }
    }

    /// Whether an existing directory must be removed before the swap.
    pub fn replaces_existing(&self) -> bool {
        match self {
            Action::Skip { .. } => false,
            Action::Upgrade { .. } => true,
            Action::FreshInstall {
                replace_existing, ..
            } => *replace_existing,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Skip { version } => write!(f, "keep Flutter {}", version),
            Action::Upgrade { from, to } => write!(f, "upgrade Flutter {} -> {}", from, to),
            Action::FreshInstall {
                to,
                replace_existing: true,
            } => write!(f, "replace the existing directory with Flutter {}", to),
            Action::FreshInstall { to, .. } => write!(f, "install Flutter {}", to),
        }
    }
}

/// Compare the local state with the latest release version.
///
/// Versions are compared as trimmed strings; any difference is an upgrade,
/// including a newer local build.
pub fn decide(local: &LocalSdk, latest: &str) -> Action {
    let latest = latest.trim();
    match local {
        LocalSdk::Missing => Action::FreshInstall {
            to: latest.to_string(),
            replace_existing: false,
        },
        LocalSdk::Invalid { .. } => Action::FreshInstall {
            to: latest.to_string(),
            replace_existing: true,
        },
        LocalSdk::Installed { version } if version.trim() == latest => Action::Skip {
            version: latest.to_string(),
        },
        LocalSdk::Installed { version } => Action::Upgrade {
            from: version.trim().to_string(),
            to: latest.to_string(),
        },
    }
}
