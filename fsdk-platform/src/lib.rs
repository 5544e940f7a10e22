//! Cross-platform layer for flutter-setup.
//!
//! The host OS is resolved once into a [`Platform`] descriptor which is then
//! passed explicitly to everything that needs OS-specific behaviour. All OS
//! branching is an exhaustive match on [`OsKind`].

pub mod descriptor;
pub mod os;
pub mod remediate;
pub mod shells;

pub use descriptor::Platform;
pub use os::{Arch, OsKind};
pub use remediate::RemediationReport;
pub use shells::Shell;
