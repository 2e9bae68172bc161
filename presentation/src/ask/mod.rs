//! Interactive single-agent ask mode

mod repl;

pub use repl::{AskRepl, ReplInput};
