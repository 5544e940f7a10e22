//! Flutter SDK installer library.
//!
//! Resolves the latest release of a channel, compares it with whatever is
//! already installed and installs, upgrades or leaves the SDK alone.

pub mod cli;
pub mod download;
pub mod extract;
pub mod installer;
pub mod local;
pub mod path_hint;
pub mod reconcile;
pub mod releases;

pub use installer::{InstallSettings, Installer, Outcome};
pub use local::LocalSdk;
pub use reconcile::{decide, Action};
pub use releases::{HttpReleaseSource, Release, ReleaseManifest, ReleaseSource};
