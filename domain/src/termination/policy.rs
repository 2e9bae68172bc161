//! Approval-based termination policy
//!
//! The conversation stops when an *authorized* participant says the
//! trigger phrase. Messages from anyone else are ignored for this
//! purpose even when they contain the phrase.

use super::strategy::TerminationStrategy;
use crate::conversation::Transcript;
use crate::core::error::DomainError;
use crate::core::participant::ParticipantId;
use crate::core::string::contains_ignore_case;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default phrase an authorized participant uses to approve
pub const DEFAULT_TRIGGER_PHRASE: &str = "APPROVED";

/// Default cap on participant turns per run
pub const DEFAULT_MAXIMUM_ITERATIONS: usize = 3;

/// Construction-time settings for [`ApprovalTermination`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationConfig {
    /// Participants whose messages may end the conversation
    pub authorized_participants: Vec<ParticipantId>,
    /// Upper bound on participant turns; enforced by the driver
    pub maximum_iterations: usize,
    /// Case-insensitive substring that signals approval
    pub trigger_phrase: String,
}

impl TerminationConfig {
    pub fn new(authorized_participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            authorized_participants: authorized_participants.into_iter().collect(),
            maximum_iterations: DEFAULT_MAXIMUM_ITERATIONS,
            trigger_phrase: DEFAULT_TRIGGER_PHRASE.to_string(),
        }
    }

    pub fn with_maximum_iterations(mut self, max: usize) -> Self {
        self.maximum_iterations = max;
        self
    }

    pub fn with_trigger_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.trigger_phrase = phrase.into();
        self
    }
}

/// Stops a group chat once an authorized participant approves.
///
/// # Example
///
/// ```
/// use groupchat_domain::conversation::{Message, Transcript};
/// use groupchat_domain::termination::{ApprovalTermination, TerminationConfig};
/// use groupchat_domain::ParticipantId;
///
/// let reviewer = ParticipantId::new("Reviewer");
/// let policy = ApprovalTermination::new(TerminationConfig::new([reviewer.clone()])).unwrap();
///
/// let mut t = Transcript::new();
/// assert!(!policy.should_terminate(&t));
///
/// t.push(Message::assistant(reviewer, "approved, looks great"));
/// assert!(policy.should_terminate(&t));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalTermination {
    authorized: BTreeSet<ParticipantId>,
    maximum_iterations: usize,
    trigger_phrase: String,
}

impl ApprovalTermination {
    /// Validate the config and build the policy.
    ///
    /// Fails with [`DomainError::InvalidConfiguration`] when nobody is
    /// authorized (the policy could never fire), when the turn cap is
    /// zero, or when the trigger phrase is blank (it would match every
    /// message).
    pub fn new(config: TerminationConfig) -> Result<Self, DomainError> {
        if config.authorized_participants.is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "termination policy needs at least one authorized participant".to_string(),
            ));
        }
        if config.maximum_iterations == 0 {
            return Err(DomainError::InvalidConfiguration(
                "maximum_iterations must be positive".to_string(),
            ));
        }
        if config.trigger_phrase.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "trigger_phrase cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            authorized: config.authorized_participants.into_iter().collect(),
            maximum_iterations: config.maximum_iterations,
            trigger_phrase: config.trigger_phrase,
        })
    }

    /// True iff the last message comes from an authorized participant and
    /// its text contains the trigger phrase (ignoring case).
    ///
    /// Empty transcripts, author-less messages and image-only messages
    /// all yield `false`.
    pub fn should_terminate(&self, transcript: &Transcript) -> bool {
        let Some(last) = transcript.last() else {
            return false;
        };
        let Some(author) = last.author() else {
            return false;
        };
        if !self.is_authorized(author) {
            return false;
        }
        match last.text() {
            Some(text) => contains_ignore_case(&text, &self.trigger_phrase),
            None => false,
        }
    }

    pub fn is_authorized(&self, participant: &ParticipantId) -> bool {
        self.authorized.contains(participant)
    }

    pub fn authorized_participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.authorized.iter()
    }

    pub fn maximum_iterations(&self) -> usize {
        self.maximum_iterations
    }

    pub fn trigger_phrase(&self) -> &str {
        &self.trigger_phrase
    }
}

impl TerminationStrategy for ApprovalTermination {
    fn should_terminate(&self, transcript: &Transcript) -> bool {
        ApprovalTermination::should_terminate(self, transcript)
    }
}
