//! Shell detection and the PATH line users are told to add.
//!
//! Nothing here edits a profile. The installer only prints instructions.

use std::path::{Path, PathBuf};

use crate::descriptor::Platform;
use crate::os::OsKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Cmd,
}

impl Shell {
    /// Pick the user's shell from `SHELL` / `PSModulePath` style variables.
    pub fn detect(platform: &Platform, lookup: impl Fn(&str) -> Option<String>) -> Self {
        match platform.os {
            OsKind::Windows => {
                if lookup("PSModulePath").is_some() {
                    Shell::PowerShell
                } else {
                    Shell::Cmd
                }
            }
            OsKind::MacOS => Self::from_shell_var(lookup("SHELL")).unwrap_or(Shell::Zsh),
            OsKind::Linux => Self::from_shell_var(lookup("SHELL")).unwrap_or(Shell::Bash),
        }
    }

    pub fn detect_from_env(platform: &Platform) -> Self {
        Self::detect(platform, |key| std::env::var(key).ok())
    }

    fn from_shell_var(shell: Option<String>) -> Option<Self> {
        let shell = shell?;
        match Path::new(&shell).file_name()?.to_str()? {
            "bash" => Some(Shell::Bash),
            "zsh" => Some(Shell::Zsh),
            "fish" => Some(Shell::Fish),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
            Shell::Cmd => "cmd",
        }
    }

    /// Profile file the PATH line belongs in. `None` for Windows shells,
    /// where a one-off command updates the user environment instead.
    pub fn profile_path(self, home: &Path) -> Option<PathBuf> {
        match self {
            Shell::Bash => Some(home.join(".bashrc")),
            Shell::Zsh => Some(home.join(".zshrc")),
            Shell::Fish => Some(home.join(".config").join("fish").join("config.fish")),
            Shell::PowerShell | Shell::Cmd => None,
        }
    }

    /// The line or command that appends `dir` to the user's PATH.
    pub fn path_export_syntax(self, dir: &Path) -> String {
        let dir = dir.display();
        match self {
            Shell::Bash | Shell::Zsh => format!("export PATH=\"$PATH:{}\"", dir),
            Shell::Fish => format!("fish_add_path -a \"{}\"", dir),
            Shell::PowerShell => format!(
                "[Environment]::SetEnvironmentVariable('Path', [Environment]::GetEnvironmentVariable('Path', 'User') + ';{}', 'User')",
                dir
            ),
            Shell::Cmd => format!("setx PATH \"%PATH%;{}\"", dir),
        }
    }
}
