//! PATH guidance printed after an install.
//!
//! Only prints. The user's PATH and shell profiles are never modified.

use std::path::{Path, PathBuf};

use colored::Colorize;
use fsdk_core::{fsdk_msg, fsdk_println};
use fsdk_messages::MESSAGES;
use fsdk_platform::{Platform, Shell};

/// What the current environment says about `<install>/bin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHint {
    pub bin_dir: PathBuf,
    pub on_path: bool,
    /// Another `flutter` launcher that `PATH` resolves before this install.
    pub shadowed_by: Option<PathBuf>,
    pub shell: Shell,
    pub profile: Option<PathBuf>,
    pub line: String,
}

impl PathHint {
    /// Build the hint from an explicit `PATH` value and `which flutter` result.
    pub fn analyze(
        platform: &Platform,
        install_dir: &Path,
        path_var: &str,
        resolved_flutter: Option<PathBuf>,
        shell: Shell,
    ) -> Self {
        let bin_dir = install_dir.join("bin");
        let on_path = platform.path_contains(path_var, &bin_dir);
        let shadowed_by = resolved_flutter
            .filter(|found| !platform.path_contains(&launcher_dir(found), &bin_dir));

        Self {
            line: shell.path_export_syntax(&bin_dir),
            profile: shell.profile_path(platform.home()),
            bin_dir,
            on_path,
            shadowed_by,
            shell,
        }
    }

    /// Build the hint from the running process's environment.
    pub fn from_env(platform: &Platform, install_dir: &Path) -> Self {
        let path_var = std::env::var("PATH").unwrap_or_default();
        let resolved = which::which("flutter").ok();
        Self::analyze(
            platform,
            install_dir,
            &path_var,
            resolved,
            Shell::detect_from_env(platform),
        )
    }

    pub fn print(&self) {
        fsdk_msg!(progress, MESSAGES.path_final_configuration);

        if self.on_path {
            fsdk_msg!(success, MESSAGES.path_already_configured);
        } else {
            fsdk_msg!(warning, MESSAGES.path_action_required);
            match &self.profile {
                Some(profile) => {
                    fsdk_msg!(println, MESSAGES.path_add_line, profile = profile.display());
                }
                None => {
                    fsdk_msg!(println, MESSAGES.path_run_command);
                }
            }
            fsdk_println!("  {}", self.line.cyan());
        }

        if let Some(found) = &self.shadowed_by {
            fsdk_msg!(warning, self.shadow_template(), found = found.display());
        }

        fsdk_println!();
        fsdk_println!("{}", MESSAGES.setup_ready.green().bold());
        fsdk_println!("   {}", MESSAGES.setup_doctor_hint.cyan());
    }
}

impl PathHint {
    /// Another launcher only sits "earlier" in PATH when this install's
    /// `bin` is on PATH too.
    fn shadow_template(&self) -> &'static str {
        if self.on_path {
            MESSAGES.path_shadowed
        } else {
            MESSAGES.path_shadowed_off_path
        }
    }
}

// Split on both separators so Windows paths are handled on any host.
fn launcher_dir(launcher: &Path) -> String {
    let text = launcher.to_string_lossy();
    match text.rfind(['/', '\\']) {
        Some(index) => text[..index].to_string(),
        None => String::new(),
    }
}

/// Print PATH guidance for `install_dir` using the current environment.
pub fn report(platform: &Platform, install_dir: &Path) -> PathHint {
    let hint = PathHint::from_env(platform, install_dir);
    tracing::debug!(on_path = hint.on_path, shell = hint.shell.name(), "path check");
    hint.print();
    hint
}
