//! Application-level configuration.
//!
//! - [`ChatParams`]: turn loop control (turn cap, turn order, timeouts)

pub mod chat_params;

pub use chat_params::ChatParams;
