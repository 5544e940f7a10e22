pub mod error;
pub mod file_system;
pub mod output_macros;
pub mod temp_dir;

pub use error::{ErrorKind, FsdkError, Result};

// Output macros expand to `$crate::msg_format!`, so the messages crate is
// re-exported for them.
pub use fsdk_messages as messages;
pub use fsdk_messages::msg_format;
