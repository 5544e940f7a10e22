//! The install workflow.
//!
//! Order matters: the latest release is resolved and the archive downloaded
//! and verified before anything under the install path is touched. The old
//! directory is only removed once a complete SDK sits in a staging directory
//! beside it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;
use fsdk_config::{Channel, SetupConfig};
use fsdk_core::file_system::{ensure_dir, rename};
use fsdk_core::temp_dir::{create_staging_dir, create_temp_dir};
use fsdk_core::{fsdk_msg, fsdk_println, FsdkError, Result};
use fsdk_messages::MESSAGES;
use fsdk_platform::Platform;
use tracing::{debug, info, info_span, warn};

use crate::download::verify_sha256;
use crate::extract;
use crate::local::{self, LocalSdk};
use crate::path_hint;
use crate::reconcile::{self, Action};
use crate::releases::{Release, ReleaseSource};

/// Per-run settings, resolved from config and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    pub install_dir: PathBuf,
    pub channel: Channel,
    /// Report the decision without changing anything.
    pub check_only: bool,
    /// Print PATH guidance after an install.
    pub path_guidance: bool,
}

impl InstallSettings {
    pub fn from_config(config: &SetupConfig, platform: &Platform, check_only: bool) -> Self {
        Self {
            install_dir: config
                .resolve_install_dir(platform.home(), platform.default_install_dir()),
            channel: config.channel,
            check_only,
            path_guidance: true,
        }
    }
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub action: Action,
    pub install_dir: PathBuf,
    /// Whether anything on disk changed.
    pub changed: bool,
}

pub struct Installer {
    platform: Platform,
    settings: InstallSettings,
}

impl Installer {
    pub fn new(platform: Platform, settings: InstallSettings) -> Self {
        Self { platform, settings }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn settings(&self) -> &InstallSettings {
        &self.settings
    }

    pub fn print_banner(&self) {
        fsdk_println!("{}", MESSAGES.setup_header.bold());
        fsdk_msg!(
            println,
            MESSAGES.setup_detected_system,
            os = self.platform.os,
            arch = self.platform.arch
        );
        fsdk_msg!(
            println,
            MESSAGES.setup_install_dir,
            path = self.settings.install_dir.display()
        );
    }

    /// Bring the install directory to the latest release of the channel.
    pub fn run(&self, source: &dyn ReleaseSource) -> Result<Outcome> {
        let install_dir = &self.settings.install_dir;
        let span = info_span!(
            "install",
            install_dir = %install_dir.display(),
            channel = %self.settings.channel
        );
        let _enter = span.enter();

        fsdk_msg!(progress, MESSAGES.release_checking, channel = self.settings.channel);
        let release = source.latest(&self.platform, self.settings.channel)?;
        fsdk_msg!(
            println,
            MESSAGES.release_latest,
            channel = self.settings.channel,
            version = release.version.bold()
        );

        let local = local::inspect(install_dir, &self.platform);
        self.report_local(&local);

        let action = reconcile::decide(&local, &release.version);
        debug!(?local, ?action, "reconciled");

        match &action {
            Action::Skip { version } => {
                fsdk_msg!(success, MESSAGES.local_up_to_date, version = version);
                fsdk_msg!(println, MESSAGES.local_skipping);
            }
            Action::Upgrade { from, to } => {
                fsdk_msg!(warning, MESSAGES.local_upgrading, from = from, to = to);
            }
            Action::FreshInstall { .. } => {}
        }
        if !action.mutates_disk() {
            return Ok(self.outcome(action, false));
        }

        if self.settings.check_only {
            fsdk_msg!(info, MESSAGES.install_check_only, action = action);
            return Ok(self.outcome(action, false));
        }

        self.install(source, &release, &action)?;

        if self.settings.path_guidance {
            path_hint::report(&self.platform, install_dir);
        }
        Ok(self.outcome(action, true))
    }

    fn outcome(&self, action: Action, changed: bool) -> Outcome {
        Outcome {
            action,
            install_dir: self.settings.install_dir.clone(),
            changed,
        }
    }

    fn report_local(&self, local: &LocalSdk) {
        let path = self.settings.install_dir.display();
        match local {
            LocalSdk::Installed { version } => {
                fsdk_msg!(println, MESSAGES.local_version, version = version.bold());
            }
            LocalSdk::Missing => {
                fsdk_msg!(warning, MESSAGES.local_not_found, path = path);
            }
            LocalSdk::Invalid { reason } => {
                fsdk_msg!(warning, MESSAGES.local_invalid, path = path, reason = reason);
            }
        }
    }

    fn install(&self, source: &dyn ReleaseSource, release: &Release, action: &Action) -> Result<()> {
        let install_dir = &self.settings.install_dir;

        let download_dir = create_temp_dir("flutter-download-")?;
        let archive = download_dir.path().join(release.archive_file_name());

        fsdk_msg!(progress, MESSAGES.install_downloading, version = release.version);
        source.download(release, &archive)?;
        fsdk_msg!(success, MESSAGES.install_download_finished);

        match &release.sha256 {
            Some(expected) => {
                verify_sha256(&archive, expected)?;
                fsdk_msg!(success, MESSAGES.install_checksum_ok);
            }
            None => warn!(archive = %release.archive_url, "release has no published checksum"),
        }

        let parent = parent_dir(install_dir);
        ensure_dir(&parent)?;
        let staging = create_staging_dir(&parent)?;

        fsdk_msg!(progress, MESSAGES.install_extracting, path = install_dir.display());
        let entries = extract::extract(&archive, staging.path())?;
        let sdk_root = extract::locate_sdk_root(staging.path(), &self.platform)?;
        debug!(entries, sdk_root = %sdk_root.display(), "staged");
        fsdk_msg!(success, MESSAGES.install_extraction_complete);

        drop(download_dir);

        if action.replaces_existing() {
            self.remove_existing(install_dir)?;
        }

        rename(&sdk_root, install_dir)?;
        drop(staging);

        self.verify_installed(release)?;
        info!(version = %release.version, "install complete");
        fsdk_msg!(
            success,
            MESSAGES.install_complete,
            version = release.version,
            path = install_dir.display()
        );
        Ok(())
    }

    fn remove_existing(&self, install_dir: &Path) -> Result<()> {
        let metadata = match fs::symlink_metadata(install_dir) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(FsdkError::DirectoryLocked {
                    path: install_dir.to_path_buf(),
                    source,
                })
            }
        };

        fsdk_msg!(warning, MESSAGES.install_removing_old);
        if metadata.is_dir() {
            let report = self.platform.remove_install_dir(install_dir)?;
            if report.cleared > 0 {
                fsdk_msg!(info, MESSAGES.install_cleared_readonly, count = report.cleared);
            }
            Ok(())
        } else {
            fs::remove_file(install_dir).map_err(|source| FsdkError::DirectoryLocked {
                path: install_dir.to_path_buf(),
                source,
            })
        }
    }

    fn verify_installed(&self, release: &Release) -> Result<()> {
        let install_dir = &self.settings.install_dir;
        match local::inspect(install_dir, &self.platform) {
            LocalSdk::Installed { version } if version == release.version.trim() => Ok(()),
            other => Err(FsdkError::invalid_data(
                install_dir,
                "verify",
                format!(
                    "expected Flutter {} after install, found {:?}",
                    release.version, other
                ),
            )),
        }
    }
}

fn parent_dir(install_dir: &Path) -> PathBuf {
    match install_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsdk_platform::{Arch, OsKind};
    use std::cell::Cell;
    use tempfile::tempdir;

    struct OfflineSource {
        downloads: Cell<usize>,
    }

    impl ReleaseSource for OfflineSource {
        fn latest(&self, _platform: &Platform, _channel: Channel) -> Result<Release> {
            Err(FsdkError::network("timed out trying to fetch release manifest"))
        }

        fn download(&self, _release: &Release, _dest: &Path) -> Result<()> {
            self.downloads.set(self.downloads.get() + 1);
            Err(FsdkError::network("unreachable"))
        }
    }

    fn settings(install_dir: PathBuf) -> InstallSettings {
        InstallSettings {
            install_dir,
            channel: Channel::Stable,
            check_only: false,
            path_guidance: false,
        }
    }

    #[test]
    fn test_network_failure_aborts_before_touching_disk() {
        let dir = tempdir().unwrap();
        let install_dir = dir.path().join("flutter");
        fs::create_dir_all(install_dir.join("bin")).unwrap();
        fs::write(install_dir.join("bin/flutter"), "#!/bin/sh").unwrap();
        fs::write(install_dir.join("version"), "3.7.0").unwrap();

        let source = OfflineSource {
            downloads: Cell::new(0),
        };
        let installer = Installer::new(
            Platform::new(OsKind::Linux, Arch::X64, dir.path()),
            settings(install_dir.clone()),
        );

        let err = installer.run(&source).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(source.downloads.get(), 0);
        assert_eq!(fs::read_to_string(install_dir.join("version")).unwrap(), "3.7.0");
    }

    #[test]
    fn test_settings_from_config() {
        let platform = Platform::new(OsKind::Linux, Arch::X64, "/home/dev");
        let config = SetupConfig {
            channel: Channel::Beta,
            ..Default::default()
        };
        let settings = InstallSettings::from_config(&config, &platform, true);
        assert_eq!(
            settings.install_dir,
            PathBuf::from("/home/dev/development/flutter")
        );
        assert_eq!(settings.channel, Channel::Beta);
        assert!(settings.check_only);
    }

    #[test]
    fn test_remove_existing_ignores_missing_dir() {
        let dir = tempdir().unwrap();
        let installer = Installer::new(
            Platform::new(OsKind::Linux, Arch::X64, dir.path()),
            settings(dir.path().join("flutter")),
        );
        installer.remove_existing(&dir.path().join("flutter")).unwrap();
    }

    #[test]
    fn test_remove_existing_reports_unreadable_path() {
        let dir = tempdir().unwrap();
        // A file where a directory is expected: stat fails, but not with NotFound.
        fs::write(dir.path().join("sdks"), "not a directory").unwrap();
        let install_dir = dir.path().join("sdks").join("flutter");
        let installer = Installer::new(
            Platform::new(OsKind::Linux, Arch::X64, dir.path()),
            settings(install_dir.clone()),
        );

        let err = installer.remove_existing(&install_dir).unwrap_err();
        assert!(matches!(err, FsdkError::DirectoryLocked { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_parent_dir_of_relative_path() {
        assert_eq!(parent_dir(Path::new("flutter")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("/opt/flutter")), PathBuf::from("/opt"));
    }
}
