//! Termination domain
//!
//! Decides when a group chat is over. Two independent stop conditions
//! exist:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ after every appended message                                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │  TerminationStrategy::should_terminate(transcript)           │
//! │     true  → TerminationReason::Approved                      │
//! │  turns >= maximum_iterations (checked by the driver)         │
//! │     true  → TerminationReason::TurnLimitReached              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The strategy only looks at content; counting turns is the driver's job.

pub mod policy;
pub mod reason;
pub mod strategy;

pub use policy::{
    ApprovalTermination, DEFAULT_MAXIMUM_ITERATIONS, DEFAULT_TRIGGER_PHRASE, TerminationConfig,
};
pub use reason::TerminationReason;
pub use strategy::TerminationStrategy;
