//! Flutter release manifests and the sources that serve them.
//!
//! The manifest (`releases_<os>.json`) lists every published build. The
//! current build of a channel is identified by hash under `current_release`;
//! macOS publishes one entry per architecture for the same hash.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use fsdk_config::{Channel, SetupConfig};
use fsdk_core::msg_format;
use fsdk_core::{FsdkError, Result};
use fsdk_messages::MESSAGES;
use fsdk_platform::{Arch, Platform};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info_span};

use crate::download;

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseManifest {
    #[serde(default)]
    pub base_url: Option<String>,
    pub current_release: HashMap<String, String>,
    pub releases: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub hash: String,
    #[serde(default)]
    pub channel: Option<String>,
    pub version: String,
    pub archive: String,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub dart_sdk_arch: Option<String>,
}

/// The release selected for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub hash: String,
    pub channel: Channel,
    pub archive_url: String,
    pub sha256: Option<String>,
}

impl Release {
    /// Last path segment of the archive URL.
    pub fn archive_file_name(&self) -> &str {
        self.archive_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("flutter_archive")
    }
}

impl ReleaseManifest {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FsdkError::network(format!("invalid release manifest: {}", e)))
    }

    /// Resolve the current release of `channel` for `arch`.
    ///
    /// Prefers the entry built for `arch`; manifests without
    /// `dart_sdk_arch` (or without a matching one) fall back to the first
    /// entry carrying the hash.
    pub fn current(&self, channel: Channel, arch: &Arch, fallback_base: &str) -> Result<Release> {
        let hash = self.current_release.get(channel.as_str()).ok_or_else(|| {
            FsdkError::network(msg_format!(MESSAGES.release_no_hash, channel = channel))
        })?;

        let mut candidates = self.releases.iter().filter(|entry| &entry.hash == hash);
        let first = candidates.clone().next().ok_or_else(|| {
            FsdkError::network(msg_format!(MESSAGES.release_no_match, hash = hash))
        })?;
        let entry = candidates
            .find(|entry| entry.dart_sdk_arch.as_deref() == Some(arch.dart_sdk_arch()))
            .unwrap_or(first);

        let base = self.base_url.as_deref().unwrap_or(fallback_base);
        Ok(Release {
            version: entry.version.trim().to_string(),
            hash: entry.hash.clone(),
            channel,
            archive_url: join_url(base, &entry.archive),
            sha256: entry.sha256.clone().filter(|s| !s.trim().is_empty()),
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Where releases come from. The workflow only talks to this trait.
pub trait ReleaseSource {
    /// Current release of `channel` for the given platform.
    fn latest(&self, platform: &Platform, channel: Channel) -> Result<Release>;

    /// Fetch the release archive to `dest`.
    fn download(&self, release: &Release, dest: &Path) -> Result<()>;
}

/// Release source backed by the Flutter release server (or a mirror).
pub struct HttpReleaseSource {
    client: Client,
    releases_url: String,
    request_timeout: Duration,
}

impl HttpReleaseSource {
    pub fn new(config: &SetupConfig) -> Result<Self> {
        // No overall timeout on the client: the SDK archive is large. The
        // manifest request sets its own.
        let client = Client::builder()
            .user_agent(concat!("flutter-setup/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout())
            .timeout(None)
            .build()
            .map_err(|e| FsdkError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            releases_url: config.releases_url.trim().to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    pub fn manifest_url(&self, platform: &Platform) -> String {
        join_url(&self.releases_url, &platform.manifest_name())
    }

    fn fetch_manifest(&self, url: &str) -> Result<ReleaseManifest> {
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FsdkError::network(describe("fetch release manifest", url, &e)))?;

        let body = response
            .text()
            .map_err(|e| FsdkError::network(describe("read release manifest", url, &e)))?;
        ReleaseManifest::parse(&body)
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn latest(&self, platform: &Platform, channel: Channel) -> Result<Release> {
        let url = self.manifest_url(platform);
        let span = info_span!("fetch_manifest", url = %url, channel = %channel);
        let _enter = span.enter();

        let manifest = self.fetch_manifest(&url)?;
        let release = manifest.current(channel, &platform.arch, &self.releases_url)?;
        debug!(version = %release.version, archive = %release.archive_url, "resolved release");
        Ok(release)
    }

    fn download(&self, release: &Release, dest: &Path) -> Result<()> {
        download::download_to_file(&self.client, &release.archive_url, dest).map(|_| ())
    }
}

/// Human readable reqwest failure, calling out timeouts explicitly.
pub(crate) fn describe(action: &str, url: &str, error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timed out trying to {} from {}", action, url)
    } else if let Some(status) = error.status() {
        format!("failed to {} from {}: HTTP {}", action, url, status)
    } else {
        format!("failed to {} from {}: {}", action, url, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
      "base_url": "https://storage.googleapis.com/flutter_infra_release/releases",
      "current_release": { "beta": "bbb", "stable": "aaa" },
      "releases": [
        {
          "hash": "bbb", "channel": "beta", "version": "3.14.0-0.1.pre",
          "dart_sdk_arch": "x64",
          "archive": "beta/macos/flutter_macos_3.14.0-0.1.pre-beta.zip",
          "sha256": "11"
        },
        {
          "hash": "aaa", "channel": "stable", "version": "3.10.0",
          "dart_sdk_arch": "x64",
          "archive": "stable/macos/flutter_macos_3.10.0-stable.zip",
          "sha256": "22"
        },
        {
          "hash": "aaa", "channel": "stable", "version": "3.10.0",
          "dart_sdk_arch": "arm64",
          "archive": "stable/macos/flutter_macos_arm64_3.10.0-stable.zip",
          "sha256": "33"
        }
      ]
    }"#;

    #[test]
    fn test_current_stable_for_arch() {
        let manifest = ReleaseManifest::parse(MANIFEST).unwrap();

        let arm = manifest.current(Channel::Stable, &Arch::Arm64, "unused").unwrap();
        assert_eq!(arm.version, "3.10.0");
        assert_eq!(arm.sha256.as_deref(), Some("33"));
        assert_eq!(
            arm.archive_url,
            "https://storage.googleapis.com/flutter_infra_release/releases/stable/macos/flutter_macos_arm64_3.10.0-stable.zip"
        );
        assert_eq!(arm.archive_file_name(), "flutter_macos_arm64_3.10.0-stable.zip");

        let x64 = manifest.current(Channel::Stable, &Arch::X64, "unused").unwrap();
        assert_eq!(x64.sha256.as_deref(), Some("22"));
    }

    #[test]
    fn test_unknown_arch_falls_back_to_first_entry() {
        let manifest = ReleaseManifest::parse(MANIFEST).unwrap();
        let release = manifest
            .current(Channel::Stable, &Arch::Other("riscv64".into()), "unused")
            .unwrap();
        assert_eq!(release.sha256.as_deref(), Some("22"));
    }

    #[test]
    fn test_beta_channel() {
        let manifest = ReleaseManifest::parse(MANIFEST).unwrap();
        let release = manifest.current(Channel::Beta, &Arch::X64, "unused").unwrap();
        assert_eq!(release.version, "3.14.0-0.1.pre");
        assert_eq!(release.channel, Channel::Beta);
    }

    #[test]
    fn test_missing_base_url_uses_fallback() {
        let manifest = ReleaseManifest::parse(
            r#"{"current_release": {"stable": "h"},
                "releases": [{"hash": "h", "version": "3.10.0", "archive": "/stable/linux/f.tar.xz"}]}"#,
        )
        .unwrap();
        let release = manifest
            .current(Channel::Stable, &Arch::X64, "http://mirror.local/releases/")
            .unwrap();
        assert_eq!(release.archive_url, "http://mirror.local/releases/stable/linux/f.tar.xz");
        assert_eq!(release.sha256, None);
    }

    #[test]
    fn test_unmatched_hash_is_network_error() {
        let manifest = ReleaseManifest::parse(
            r#"{"current_release": {"stable": "missing"}, "releases": []}"#,
        )
        .unwrap();
        let err = manifest.current(Channel::Stable, &Arch::X64, "x").unwrap_err();
        assert_eq!(err.kind(), fsdk_core::ErrorKind::Network);
        assert!(err.to_string().contains("could not match hash missing"));

        let err = manifest.current(Channel::Beta, &Arch::X64, "x").unwrap_err();
        assert!(err.to_string().contains("no current release for channel 'beta'"));
    }

    #[test]
    fn test_garbage_manifest_is_network_error() {
        let err = ReleaseManifest::parse("<html>captive portal</html>").unwrap_err();
        assert_eq!(err.kind(), fsdk_core::ErrorKind::Network);
    }

    #[test]
    fn test_manifest_url() {
        let config = SetupConfig {
            releases_url: "http://127.0.0.1:9/releases/".to_string(),
            ..Default::default()
        };
        let source = HttpReleaseSource::new(&config).unwrap();
        let platform = Platform::new(fsdk_platform::OsKind::Linux, Arch::X64, "/home/dev");
        assert_eq!(
            source.manifest_url(&platform),
            "http://127.0.0.1:9/releases/releases_linux.json"
        );
    }
}
