use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

use fsdk_messages::errors::{LOCKED_DIRECTORY, NETWORK_UNAVAILABLE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsdkError {
    Network(String),
    Filesystem {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: io::Error,
    },
    DirectoryLocked {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    UnsupportedPlatform(String),
    Config(String),
    Internal(String),
}

/// Fatal error classes, each with its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Filesystem,
    UnsupportedPlatform,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Config | ErrorKind::Internal => 1,
            ErrorKind::Network => 2,
            ErrorKind::Filesystem => 3,
            ErrorKind::UnsupportedPlatform => 4,
        }
    }
}

impl FsdkError {
    pub fn network(message: impl Into<String>) -> Self {
        FsdkError::Network(message.into())
    }

    pub fn filesystem(source: io::Error, path: impl AsRef<Path>, operation: &'static str) -> Self {
        FsdkError::Filesystem {
            path: path.as_ref().to_path_buf(),
            operation,
            source,
        }
    }

    /// An `Other`-kind I/O error for failures that did not come from the OS,
    /// such as a malformed archive entry.
    pub fn invalid_data(path: impl AsRef<Path>, operation: &'static str, message: impl Into<String>) -> Self {
        Self::filesystem(
            io::Error::new(io::ErrorKind::InvalidData, message.into()),
            path,
            operation,
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FsdkError::Network(_) => ErrorKind::Network,
            FsdkError::Filesystem { .. } | FsdkError::DirectoryLocked { .. } => {
                ErrorKind::Filesystem
            }
            FsdkError::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            FsdkError::Config(_) => ErrorKind::Config,
            FsdkError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }

    /// Follow-up advice printed after the error itself, if any.
    pub fn guidance(&self) -> Option<String> {
        match self {
            FsdkError::Network(_) => Some(NETWORK_UNAVAILABLE.display()),
            FsdkError::DirectoryLocked { .. } => Some(LOCKED_DIRECTORY.display()),
            FsdkError::Filesystem { source, .. }
                if source.kind() == io::ErrorKind::PermissionDenied =>
            {
                Some(LOCKED_DIRECTORY.display())
            }
            _ => None,
        }
    }
}

impl Display for FsdkError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FsdkError::Network(s) => write!(f, "Network error: {}", s),
            FsdkError::Filesystem {
                path,
                operation,
                source,
            } => write!(
                f,
                "Filesystem error: {} {}: {}",
                operation,
                path.display(),
                source
            ),
            FsdkError::DirectoryLocked { path, source } => {
                write!(f, "Could not remove {}: {}", path.display(), source)?;
                write!(f, "\nSome files may be open or locked by another program.")
            }
            FsdkError::UnsupportedPlatform(os) => write!(
                f,
                "Unsupported platform: {} (supported: windows, macos, linux)",
                os
            ),
            FsdkError::Config(s) => write!(f, "Configuration error: {}", s),
            FsdkError::Internal(s) => write!(f, "Internal error: {}", s),
        }
    }
}

pub type Result<T> = std::result::Result<T, FsdkError>;
