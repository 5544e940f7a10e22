//! Central registry for all user-facing message templates.
//!
//! Naming Convention:
//! - `setup_*` - Banner and run-level messages
//! - `release_*` - Release manifest lookup
//! - `local_*` - Inspection of the existing install
//! - `install_*` - Download, extraction and swap
//! - `path_*` - PATH guidance
//!
//! Templates use `{variable}` syntax for runtime values, which are
//! substituted by [`msg_format!`](crate::msg_format).

pub struct Messages {
    // ============================================================================
    // Setup Messages
    // ============================================================================
    pub setup_header: &'static str,
    pub setup_detected_system: &'static str,
    pub setup_install_dir: &'static str,
    pub setup_ready: &'static str,
    pub setup_doctor_hint: &'static str,

    // ============================================================================
    // Release Manifest Messages
    // ============================================================================
    pub release_checking: &'static str,
    pub release_latest: &'static str,
    pub release_no_hash: &'static str,
    pub release_no_match: &'static str,

    // ============================================================================
    // Local Install Messages
    // ============================================================================
    pub local_version: &'static str,
    pub local_not_found: &'static str,
    pub local_invalid: &'static str,
    pub local_up_to_date: &'static str,
    pub local_skipping: &'static str,
    pub local_upgrading: &'static str,

    // ============================================================================
    // Install Messages
    // ============================================================================
    pub install_check_only: &'static str,
    pub install_downloading: &'static str,
    pub install_download_finished: &'static str,
    pub install_checksum_ok: &'static str,
    pub install_checksum_mismatch: &'static str,
    pub install_extracting: &'static str,
    pub install_extraction_complete: &'static str,
    pub install_removing_old: &'static str,
    pub install_cleared_readonly: &'static str,
    pub install_complete: &'static str,

    // ============================================================================
    // PATH Messages
    // ============================================================================
    pub path_final_configuration: &'static str,
    pub path_already_configured: &'static str,
    pub path_action_required: &'static str,
    pub path_add_line: &'static str,
    pub path_run_command: &'static str,
    pub path_shadowed: &'static str,
    pub path_shadowed_off_path: &'static str,
}

pub const MESSAGES: Messages = Messages {
    // Setup
    setup_header: "========================================\n    FLUTTER ENVIRONMENT SETUP\n========================================",
    setup_detected_system: "Detected System: {os} ({arch})",
    setup_install_dir: "Install Directory: {path}",
    setup_ready: "========================================\n   READY TO CODE! 🚀\n========================================",
    setup_doctor_hint: "Run 'flutter doctor' to verify setup.",

    // Release manifest
    release_checking: "🔍 Checking for latest {channel} release...",
    release_latest: "Latest {channel} version: {version}",
    release_no_hash: "manifest has no current release for channel '{channel}'",
    release_no_match: "could not match hash {hash} to a release",

    // Local install
    local_version: "   Local Version:         {version}",
    local_not_found: "Flutter not found at {path}. Proceeding with fresh install...",
    local_invalid: "Existing directory at {path} is not a valid Flutter SDK ({reason}). Reinstalling...",
    local_up_to_date: "Great news! You are already on the latest version ({version}).",
    local_skipping: "Skipping installation to save time.",
    local_upgrading: "Version mismatch. Upgrading {from} -> {to}...",

    // Install
    install_check_only: "Check only: would {action}. Nothing was changed.",
    install_downloading: "⬇️  Downloading Flutter SDK {version}...",
    install_download_finished: "Download finished.",
    install_checksum_ok: "Checksum verified.",
    install_checksum_mismatch: "checksum mismatch for {file}: expected {expected}, got {actual}",
    install_extracting: "📦 Extracting to {path}...",
    install_extraction_complete: "Extraction complete.",
    install_removing_old: "Removing old installation directory...",
    install_cleared_readonly: "Cleared read-only attribute on {count} file(s).",
    install_complete: "Flutter {version} installed at {path}",

    // PATH
    path_final_configuration: "⚙️  Final Configuration",
    path_already_configured: "Flutter is already in your PATH.",
    path_action_required: "Action Required: Update your PATH.",
    path_add_line: "Add this to {profile}:",
    path_run_command: "Run this to finish:",
    path_shadowed: "Another Flutter at {found} appears earlier in PATH and will shadow this install.",
    path_shadowed_off_path: "'flutter' currently runs {found}; update PATH as shown above to use this install.",
};
