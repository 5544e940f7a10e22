use crate::msg_format;

/// Guidance shown beneath a fatal error.
pub struct ErrorContext {
    pub operation: &'static str,
    pub suggestions: &'static [&'static str],
}

impl ErrorContext {
    pub fn display(&self) -> String {
        let mut result = msg_format!("❌ {operation} failed", operation = self.operation);

        if !self.suggestions.is_empty() {
            result.push_str("\n\n💡 Try:");
            for suggestion in self.suggestions {
                result.push_str(&format!("\n  • {}", suggestion));
            }
        }
        result
    }
}

pub const LOCKED_DIRECTORY: ErrorContext = ErrorContext {
    operation: "Removing the old Flutter installation",
    suggestions: &[
        "Close any terminals, editors, or IDEs that have Flutter files open",
        "Stop running 'flutter' or 'dart' processes",
        "Run flutter-setup again",
    ],
};

pub const NETWORK_UNAVAILABLE: ErrorContext = ErrorContext {
    operation: "Contacting the Flutter release server",
    suggestions: &[
        "Check your internet connection or proxy settings",
        "Retry with a longer timeout: flutter-setup --timeout 60",
    ],
};
