//! Participant implementations

pub mod llm_participant;

pub use llm_participant::LlmParticipant;
