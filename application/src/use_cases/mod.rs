//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ask_session;
pub mod run_group_chat;
