//! Output macros for the flutter-setup CLI.
//!
//! Plain results go to stdout through `fsdk_println!`; status lines
//! (progress, success, warnings, errors) go to stderr so they never mix with
//! output another program might parse.

#[macro_export]
macro_rules! fsdk_print {
    ($($arg:tt)*) => {
        print!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! fsdk_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! fsdk_error {
    ($($arg:tt)*) => {
        eprintln!("✖ {}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! fsdk_error_hint {
    ($($arg:tt)*) => {
        eprintln!("💡 {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fsdk_success {
    ($($arg:tt)*) => {
        eprintln!("✓ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fsdk_info {
    ($($arg:tt)*) => {
        eprintln!("ℹ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fsdk_warning {
    ($($arg:tt)*) => {
        eprintln!("⚠ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! fsdk_progress {
    ($($arg:tt)*) => {
        eprintln!("\n▶ {}", format!($($arg)*));
    };
}

/// Print a message template from `MESSAGES` with placeholders filled in.
///
/// `fsdk_msg!(println, MESSAGES.local_version, version = v)` is shorthand for
/// `fsdk_println!("{}", msg_format!(MESSAGES.local_version, version = v))`.
#[macro_export]
macro_rules! fsdk_msg {
    (@emit println, $text:expr) => { $crate::fsdk_println!("{}", $text) };
    (@emit success, $text:expr) => { $crate::fsdk_success!("{}", $text) };
    (@emit warning, $text:expr) => { $crate::fsdk_warning!("{}", $text) };
    (@emit progress, $text:expr) => { $crate::fsdk_progress!("{}", $text) };
    (@emit info, $text:expr) => { $crate::fsdk_info!("{}", $text) };
    ($kind:ident, $template:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::fsdk_msg!(@emit $kind, $crate::msg_format!($template $(, $key = $value)*))
    };
}
