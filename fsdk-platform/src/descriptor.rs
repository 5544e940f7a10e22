//! The platform capability descriptor.

use std::path::{Path, PathBuf};

use fsdk_core::{FsdkError, Result};

use crate::os::{Arch, OsKind};
use crate::remediate::{self, RemediationReport};

/// Everything OS-specific the installer needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: OsKind,
    pub arch: Arch,
    home: PathBuf,
}

impl Platform {
    /// Detect the host platform.
    pub fn detect() -> Result<Self> {
        let os = OsKind::current()?;
        let home = dirs::home_dir()
            .ok_or_else(|| FsdkError::Config("Could not determine home directory".to_string()))?;
        Ok(Self::new(os, Arch::current(), home))
    }

    pub fn new(os: OsKind, arch: Arch, home: impl Into<PathBuf>) -> Self {
        Self {
            os,
            arch,
            home: home.into(),
        }
    }

    /// Descriptor for a specific OS on the host architecture.
    pub fn for_os(os: OsKind, home: impl Into<PathBuf>) -> Self {
        Self::new(os, Arch::current(), home)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn default_install_dir(&self) -> PathBuf {
        match self.os {
            OsKind::Windows => PathBuf::from(r"C:\flutter"),
            OsKind::MacOS | OsKind::Linux => self.home.join("development").join("flutter"),
        }
    }

    /// File name of the release manifest for this OS.
    pub fn manifest_name(&self) -> String {
        format!("releases_{}.json", self.os.release_name())
    }

    pub fn archive_extension(&self) -> &'static str {
        match self.os {
            OsKind::Windows | OsKind::MacOS => "zip",
            OsKind::Linux => "tar.xz",
        }
    }

    /// Name of the `flutter` launcher inside the SDK's `bin` directory.
    pub fn sdk_launcher(&self) -> &'static str {
        match self.os {
            OsKind::Windows => "flutter.bat",
            OsKind::MacOS | OsKind::Linux => "flutter",
        }
    }

    /// Relative path of the SDK marker file.
    pub fn sdk_marker(&self) -> PathBuf {
        Path::new("bin").join(self.sdk_launcher())
    }

    /// Separator between entries of the `PATH` variable.
    pub fn path_separator(&self) -> char {
        match self.os {
            OsKind::Windows => ';',
            OsKind::MacOS | OsKind::Linux => ':',
        }
    }

    /// Whether `dir` appears as an entry of `path_var`.
    pub fn path_contains(&self, path_var: &str, dir: &Path) -> bool {
        let wanted = self.normalize_path_entry(&dir.to_string_lossy());
        path_var
            .split(self.path_separator())
            .filter(|entry| !entry.trim().is_empty())
            .any(|entry| self.normalize_path_entry(entry) == wanted)
    }

    fn normalize_path_entry(&self, entry: &str) -> String {
        let entry = entry.trim().trim_matches('"');
        match self.os {
            OsKind::Windows => entry
                .replace('/', "\\")
                .trim_end_matches('\\')
                .to_lowercase(),
            OsKind::MacOS | OsKind::Linux => entry.trim_end_matches('/').to_string(),
        }
    }

    /// Make `dir` safe to delete. Clears read-only attributes on Windows,
    /// where they would otherwise make the delete fail; no-op elsewhere.
    pub fn prepare_removal(&self, dir: &Path) -> Result<RemediationReport> {
        match self.os {
            OsKind::Windows => remediate::clear_readonly(dir),
            OsKind::MacOS | OsKind::Linux => Ok(RemediationReport::default()),
        }
    }

    /// Remove an install directory, remediating first where needed.
    pub fn remove_install_dir(&self, dir: &Path) -> Result<RemediationReport> {
        let report = self.prepare_removal(dir)?;
        remediate::remove_dir(dir)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn platform(os: OsKind) -> Platform {
        Platform::new(os, Arch::X64, "/home/dev")
    }

    #[test]
    fn test_default_install_dirs() {
        assert_eq!(
            platform(OsKind::Windows).default_install_dir(),
            PathBuf::from(r"C:\flutter")
        );
        assert_eq!(
            platform(OsKind::Linux).default_install_dir(),
            Path::new("/home/dev").join("development").join("flutter")
        );
        assert_eq!(
            platform(OsKind::MacOS).default_install_dir(),
            platform(OsKind::Linux).default_install_dir()
        );
    }

    #[test]
    fn test_release_artifacts_per_os() {
        assert_eq!(platform(OsKind::Windows).manifest_name(), "releases_windows.json");
        assert_eq!(platform(OsKind::MacOS).manifest_name(), "releases_macos.json");
        assert_eq!(platform(OsKind::Linux).manifest_name(), "releases_linux.json");

        assert_eq!(platform(OsKind::Windows).archive_extension(), "zip");
        assert_eq!(platform(OsKind::MacOS).archive_extension(), "zip");
        assert_eq!(platform(OsKind::Linux).archive_extension(), "tar.xz");
    }

    #[test]
    fn test_sdk_marker() {
        assert_eq!(
            platform(OsKind::Windows).sdk_marker(),
            Path::new("bin").join("flutter.bat")
        );
        assert_eq!(platform(OsKind::Linux).sdk_marker(), Path::new("bin").join("flutter"));
    }

    #[test]
    fn test_path_contains_unix() {
        let p = platform(OsKind::Linux);
        let path_var = "/usr/bin:/home/dev/development/flutter/bin/:/bin";
        assert!(p.path_contains(path_var, Path::new("/home/dev/development/flutter/bin")));
        assert!(!p.path_contains(path_var, Path::new("/home/dev/development/flutter")));
        assert!(!p.path_contains("", Path::new("/bin")));
    }

    #[test]
    fn test_path_contains_windows_is_case_insensitive() {
        let p = platform(OsKind::Windows);
        let path_var = r"C:\Windows;c:/FLUTTER/bin\;C:\tools";
        assert!(p.path_contains(path_var, Path::new(r"C:\flutter\bin")));
        assert!(!p.path_contains(path_var, Path::new(r"D:\flutter\bin")));
    }

    #[test]
    fn test_prepare_removal_is_noop_off_windows() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("locked.txt");
        fs::write(&file, "x").unwrap();
        let mut perms = fs::metadata(&file).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&file, perms).unwrap();

        let report = platform(OsKind::Linux).prepare_removal(dir.path()).unwrap();
        assert_eq!(report, RemediationReport::default());
        assert!(fs::metadata(&file).unwrap().permissions().readonly());

        platform(OsKind::Windows).prepare_removal(dir.path()).unwrap();
        assert!(!fs::metadata(&file).unwrap().permissions().readonly());
    }

    #[test]
    fn test_remove_install_dir_missing_is_ok() {
        let dir = tempdir().unwrap();
        let report = platform(OsKind::Windows)
            .remove_install_dir(&dir.path().join("flutter"))
            .unwrap();
        assert_eq!(report.visited, 0);
    }
}
