//! Inspection of an existing SDK directory.

use std::fs;
use std::path::Path;

use fsdk_core::file_system::{has_file, read_trimmed};
use fsdk_platform::Platform;
use serde::Deserialize;

/// What is at the install path right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalSdk {
    Missing,
    Invalid { reason: String },
    Installed { version: String },
}

impl LocalSdk {
    pub fn version(&self) -> Option<&str> {
        match self {
            LocalSdk::Installed { version } => Some(version),
            LocalSdk::Missing | LocalSdk::Invalid { .. } => None,
        }
    }

    /// Whether something already occupies the install path.
    pub fn directory_exists(&self) -> bool {
        !matches!(self, LocalSdk::Missing)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionJson {
    framework_version: String,
}

const VERSION_JSON: &str = "bin/cache/flutter.version.json";
const VERSION_FILE: &str = "version";

/// Inspect `install_dir` without touching it.
pub fn inspect(install_dir: &Path, platform: &Platform) -> LocalSdk {
    if !install_dir.exists() {
        return LocalSdk::Missing;
    }
    if !install_dir.is_dir() {
        return LocalSdk::Invalid {
            reason: "path is not a directory".to_string(),
        };
    }

    let marker = platform.sdk_marker();
    if !has_file(install_dir, &marker) {
        return LocalSdk::Invalid {
            reason: format!("{} is missing", marker.display()),
        };
    }

    match read_version(install_dir) {
        Some(version) => LocalSdk::Installed { version },
        None => LocalSdk::Invalid {
            reason: "no version metadata".to_string(),
        },
    }
}

/// Framework version from `bin/cache/flutter.version.json`, falling back to
/// the plain `version` file older SDKs ship.
pub fn read_version(sdk_root: &Path) -> Option<String> {
    let from_json = fs::read_to_string(sdk_root.join(VERSION_JSON))
        .ok()
        .and_then(|content| serde_json::from_str::<VersionJson>(&content).ok())
        .map(|v| v.framework_version.trim().to_string())
        .filter(|v| !v.is_empty());

    from_json.or_else(|| read_trimmed(&sdk_root.join(VERSION_FILE)))
}
