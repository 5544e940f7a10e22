use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fsdk_core::{FsdkError, Result};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;

pub const DEFAULT_RELEASES_URL: &str =
    "https://storage.googleapis.com/flutter_infra_release/releases";

/// Installer settings.
///
/// Stored as YAML, for example:
///
/// ```yaml
/// install_dir: ~/sdks/flutter
/// channel: beta
/// timeout_secs: 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Install directory; the platform default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Release channel to track
    pub channel: Channel,

    /// Base URL the `releases_<os>.json` manifests are fetched from
    pub releases_url: String,

    /// Upper bound for the manifest request
    pub timeout_secs: u64,

    /// Upper bound for establishing any connection, including the download
    pub connect_timeout_secs: u64,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            install_dir: None,
            channel: Channel::Stable,
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 15,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub install_dir: Option<PathBuf>,
    pub channel: Option<Channel>,
    pub releases_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl SetupConfig {
    /// Load defaults, the config file and the process environment.
    pub fn load(explicit_file: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_file, |key| std::env::var(key).ok())
    }

    pub fn load_with(
        explicit_file: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let explicit = explicit_file
            .map(Path::to_path_buf)
            .or_else(|| lookup("FSDK_CONFIG").map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(FsdkError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(&path)?
            }
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| FsdkError::filesystem(e, path, "read config"))?;
        tracing::debug!(path = %path.display(), "loading config file");
        Self::from_yaml(&content)
            .map_err(|e| FsdkError::Config(format!("{}: {}", path.display(), e)))
    }

    fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml_ng::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content)
    }

    fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup("FSDK_INSTALL_DIR").filter(|v| !v.trim().is_empty()) {
            self.install_dir = Some(PathBuf::from(dir));
        }
        if let Some(channel) = lookup("FSDK_CHANNEL") {
            self.channel = channel.parse()?;
        }
        if let Some(url) = lookup("FSDK_RELEASES_URL") {
            self.releases_url = url;
        }
        if let Some(secs) = lookup("FSDK_TIMEOUT_SECS") {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                FsdkError::Config(format!("FSDK_TIMEOUT_SECS must be a number, got '{}'", secs))
            })?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) -> Result<()> {
        if let Some(dir) = overrides.install_dir {
            self.install_dir = Some(dir);
        }
        if let Some(channel) = overrides.channel {
            self.channel = channel;
        }
        if let Some(url) = overrides.releases_url {
            self.releases_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.releases_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FsdkError::Config(format!(
                "releases_url must be an http(s) URL, got '{}'",
                self.releases_url
            )));
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(FsdkError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured install directory with `~` expanded, or `default`.
    pub fn resolve_install_dir(&self, home: &Path, default: PathBuf) -> PathBuf {
        match &self.install_dir {
            Some(dir) => {
                let raw = dir.to_string_lossy();
                let expanded =
                    shellexpand::tilde_with_context(&raw, || Some(home.to_string_lossy()));
                PathBuf::from(expanded.into_owned())
            }
            None => default,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// `<config dir>/flutter-setup/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flutter-setup").join("config.yaml"))
}
