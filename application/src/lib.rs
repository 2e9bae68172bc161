//! Application layer for vision-groupchat
//!
//! This crate contains the conversation driver, participant implementations,
//! port definitions and application configuration.
//! It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::LlmParticipant;
pub use config::ChatParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{ChatMessage, CompletionRequest, GatewayError, LlmGateway, StreamHandle},
    participant::Participant,
    progress::{ChatProgressNotifier, NoProgress},
    stream::StreamEvent,
};
pub use use_cases::ask_session::AskSession;
pub use use_cases::run_group_chat::{GroupChat, GroupChatOutcome, RunGroupChatError};
