//! Presentation layer for vision-groupchat
//!
//! This crate contains the CLI definition, output formatting,
//! progress reporters, and the interactive ask REPL.

pub mod ask;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use ask::{AskRepl, ReplInput};
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
