//! Domain layer for vision-groupchat
//!
//! This crate contains the core entities, value objects and policies.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Group chat
//!
//! Two or more agents take turns answering over a shared, append-only
//! [`Transcript`]. After every turn a [`TerminationStrategy`] decides
//! whether the conversation is over.
//!
//! ## Approval termination
//!
//! [`ApprovalTermination`] ends the chat once an *authorized* participant
//! says the trigger phrase (default `APPROVED`, any casing). Running out
//! of turns ends the chat too, reported as
//! [`TerminationReason::TurnLimitReached`].

pub mod conversation;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod termination;

// Re-export commonly used types
pub use conversation::{
    Content, ContentItem, DEFAULT_IMAGE_MIME, ImageData, Message, Role, Transcript,
    mime_type_for_extension,
};
pub use core::{error::DomainError, participant::ParticipantId, string::truncate};
pub use orchestration::TurnOrder;
pub use prompt::{PromptTemplate, REVIEW_AGENT_NAME, VISION_AGENT_NAME};
pub use termination::{
    ApprovalTermination, DEFAULT_MAXIMUM_ITERATIONS, DEFAULT_TRIGGER_PHRASE, TerminationConfig,
    TerminationReason, TerminationStrategy,
};
