//! fsdk-messages
//!
//! Centralized message templates for the flutter-setup CLI.
//! Templates use `{variable}` placeholders which are filled in with
//! [`msg_format!`].

pub mod errors;
pub mod macros;
pub mod messages;

pub use messages::MESSAGES;
