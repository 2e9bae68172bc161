//! Progress notification port
//!
//! Defines the interface for reporting progress while a group chat runs.

use crate::ports::llm_gateway::GatewayError;
use groupchat_domain::{Message, ParticipantId, TerminationReason};

/// Callback for progress updates during a group chat
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, spinner, plain text, etc.)
pub trait ChatProgressNotifier: Send + Sync {
    /// Called once before the first turn
    fn on_chat_start(&self, _participants: &[ParticipantId], _maximum_iterations: usize) {}

    /// Called when a participant starts generating (turn is 1-based)
    fn on_turn_start(&self, turn: usize, speaker: &ParticipantId);

    /// Called for each text chunk while a participant is generating
    fn on_turn_chunk(&self, _speaker: &ParticipantId, _chunk: &str) {}

    /// Called after the message has been appended to the transcript
    fn on_turn_complete(&self, turn: usize, message: &Message);

    /// Called when a participant failed to produce a message
    fn on_turn_failed(&self, _turn: usize, _speaker: &ParticipantId, _error: &GatewayError) {}

    /// Called once when the run ends normally
    fn on_chat_complete(&self, reason: TerminationReason, turns: usize);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ChatProgressNotifier for NoProgress {
    fn on_turn_start(&self, _turn: usize, _speaker: &ParticipantId) {}
    fn on_turn_complete(&self, _turn: usize, _message: &Message) {}
    fn on_chat_complete(&self, _reason: TerminationReason, _turns: usize) {}
}
