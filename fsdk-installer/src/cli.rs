use std::path::PathBuf;

use clap::Parser;
use fsdk_config::{Channel, CliOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "flutter-setup",
    author,
    version,
    about = "Install or upgrade the Flutter SDK",
    long_about = None
)]
pub struct Args {
    /// Directory the SDK lives in (default: C:\flutter or ~/development/flutter)
    #[arg(long, value_name = "PATH")]
    pub install_dir: Option<PathBuf>,

    /// Release channel to track
    #[arg(long, value_enum)]
    pub channel: Option<Channel>,

    /// Base URL of the release manifests
    #[arg(long, value_name = "URL")]
    pub releases_url: Option<String>,

    /// Timeout in seconds for the release manifest request
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report what would happen without changing anything
    #[arg(long)]
    pub check: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            install_dir: self.install_dir.clone(),
            channel: self.channel,
            releases_url: self.releases_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Exit code for a failed argument parse. Bad flags are config errors;
/// `--help` and `--version` are not failures at all.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => fsdk_core::ErrorKind::Config.exit_code(),
    }
}
