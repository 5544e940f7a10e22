//! Settings for flutter-setup.
//!
//! Resolution order, later layers winning:
//! 1. built-in defaults
//! 2. YAML file (`--config`, `FSDK_CONFIG`, or `<config dir>/flutter-setup/config.yaml`)
//! 3. `FSDK_*` environment variables
//! 4. command line flags

pub mod channel;
pub mod config;

pub use channel::Channel;
pub use config::{CliOverrides, SetupConfig, DEFAULT_RELEASES_URL};
