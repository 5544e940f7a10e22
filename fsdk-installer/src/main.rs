use clap::Parser;
use fsdk_config::SetupConfig;
use fsdk_core::{fsdk_error, fsdk_error_hint, ErrorKind, Result};
use fsdk_installer::cli::{self, Args};
use fsdk_installer::{HttpReleaseSource, InstallSettings, Installer};
use fsdk_platform::Platform;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::usage_exit_code(&e));
        }
    };

    let log_guard = fsdk_logging::init_subscriber();

    let code = match run(args) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, kind = ?e.kind(), "flutter-setup failed");
            fsdk_error!("{}", e);
            if let Some(guidance) = e.guidance() {
                eprintln!("\n{}", guidance);
            } else if e.kind() == ErrorKind::Config {
                fsdk_error_hint!("Check --config, FSDK_CONFIG and the FSDK_* environment variables");
            }
            e.exit_code()
        }
    };

    // Flush buffered log lines before exiting.
    drop(log_guard);
    std::process::exit(code);
}

fn run(args: Args) -> Result<()> {
    let platform = Platform::detect()?;
    let mut config = SetupConfig::load(args.config.as_deref())?;
    config.apply_overrides(args.overrides())?;
    tracing::debug!(?config, "resolved configuration");

    let settings = InstallSettings::from_config(&config, &platform, args.check);
    let installer = Installer::new(platform, settings);
    installer.print_banner();

    let source = HttpReleaseSource::new(&config)?;
    installer.run(&source)?;
    Ok(())
}
