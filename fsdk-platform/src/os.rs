use std::env;
use std::fmt;

use fsdk_core::{FsdkError, Result};

/// Operating systems the installer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsKind {
    Windows,
    MacOS,
    Linux,
}

impl OsKind {
    /// Map a `std::env::consts::OS` value to a supported OS.
    pub fn from_target(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(OsKind::Windows),
            "macos" => Ok(OsKind::MacOS),
            "linux" => Ok(OsKind::Linux),
            other => Err(FsdkError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn current() -> Result<Self> {
        Self::from_target(env::consts::OS)
    }

    /// Name used in Flutter release manifests and archive paths.
    pub fn release_name(self) -> &'static str {
        match self {
            OsKind::Windows => "windows",
            OsKind::MacOS => "macos",
            OsKind::Linux => "linux",
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsKind::Windows => "Windows",
            OsKind::MacOS => "macOS",
            OsKind::Linux => "Linux",
        };
        f.write_str(name)
    }
}

/// Host CPU architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
    Other(String),
}

impl Arch {
    pub fn from_target(arch: &str) -> Self {
        match arch {
            "x86_64" => Arch::X64,
            "aarch64" => Arch::Arm64,
            other => Arch::Other(other.to_string()),
        }
    }

    pub fn current() -> Self {
        Self::from_target(env::consts::ARCH)
    }

    /// The `dart_sdk_arch` value Flutter manifests use for this architecture.
    pub fn dart_sdk_arch(&self) -> &str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Other(name) => name,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dart_sdk_arch())
    }
}
