//! Run Group Chat use case
//!
//! Drives a multi-agent conversation turn by turn until the termination
//! strategy approves or the turn cap is reached.
//!
//! ```text
//! add_message(user image) ─► loop {
//!     speaker  = turn_order.next_index(turns, participants)
//!     message  = speaker.generate_next(transcript)      (only suspension point)
//!     transcript.push(message)                          → yielded to caller
//!     strategy.should_terminate(transcript)?            → Approved
//!     turns >= maximum_iterations?                      → TurnLimitReached
//! }
//! ```
//!
//! A `GroupChat` is single-use: once it has finished or failed, starting
//! another conversation requires a fresh instance.

use crate::config::ChatParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::GatewayError;
use crate::ports::participant::Participant;
use crate::ports::progress::{ChatProgressNotifier, NoProgress};
use futures::Stream;
use groupchat_domain::{
    ApprovalTermination, DomainError, Message, ParticipantId, TerminationReason,
    TerminationStrategy, Transcript, truncate,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while running a group chat
#[derive(Error, Debug)]
pub enum RunGroupChatError {
    #[error("No participants configured")]
    NoParticipants,

    #[error(transparent)]
    Configuration(#[from] DomainError),

    #[error("{speaker} failed on turn {turn}: {source}")]
    Generation {
        speaker: ParticipantId,
        turn: usize,
        #[source]
        source: GatewayError,
    },

    #[error("{expected} returned a message attributed to {actual}")]
    MisattributedMessage {
        expected: ParticipantId,
        actual: String,
    },

    #[error("Chat already failed; start a new conversation")]
    AlreadyFailed,

    #[error("Chat has not finished yet")]
    NotFinished,
}

impl RunGroupChatError {
    /// The underlying generation failure, if this is one
    pub fn generation_error(&self) -> Option<&GatewayError> {
        match self {
            RunGroupChatError::Generation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct GroupChatOutcome {
    /// Which stop condition fired
    pub reason: TerminationReason,
    /// Number of participant turns taken
    pub turns: usize,
    /// Full transcript, seed messages included
    pub transcript: Transcript,
}

impl GroupChatOutcome {
    pub fn is_approved(&self) -> bool {
        self.reason.is_approved()
    }

    /// Last message produced by a participant
    pub fn final_message(&self) -> Option<&Message> {
        self.transcript.last()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    Finished(TerminationReason),
    Failed,
}

/// Conversation driver for a group of participants
pub struct GroupChat {
    participants: Vec<Arc<dyn Participant>>,
    strategy: Box<dyn TerminationStrategy>,
    params: ChatParams,
    transcript: Transcript,
    turns: usize,
    state: RunState,
    logger: Arc<dyn ConversationLogger>,
}

impl GroupChat {
    /// Create a chat with any termination strategy.
    ///
    /// Fails when there are no participants or the turn cap is zero.
    pub fn new(
        participants: Vec<Arc<dyn Participant>>,
        strategy: impl TerminationStrategy + 'static,
        params: ChatParams,
    ) -> Result<Self, RunGroupChatError> {
        if participants.is_empty() {
            return Err(RunGroupChatError::NoParticipants);
        }
        if params.maximum_iterations == 0 {
            return Err(DomainError::InvalidConfiguration(
                "maximum_iterations must be positive".to_string(),
            )
            .into());
        }

        Ok(Self {
            participants,
            strategy: Box::new(strategy),
            params,
            transcript: Transcript::new(),
            turns: 0,
            state: RunState::Running,
            logger: Arc::new(NoConversationLogger),
        })
    }

    /// Create a chat that stops on approval, using the policy's turn cap.
    pub fn with_approval(
        participants: Vec<Arc<dyn Participant>>,
        policy: ApprovalTermination,
        params: ChatParams,
    ) -> Result<Self, RunGroupChatError> {
        for authorized in policy.authorized_participants() {
            if !participants.iter().any(|p| p.id() == authorized) {
                warn!(
                    "Authorized participant {} is not part of the chat; it can never approve",
                    authorized
                );
            }
        }

        let params = params.with_maximum_iterations(policy.maximum_iterations());
        Self::new(participants, policy, params)
    }

    /// Start from an existing history instead of an empty transcript
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Append a message that isn't a participant turn (e.g. the user's image).
    ///
    /// It does not count towards `maximum_iterations`.
    pub fn add_message(&mut self, message: Message) {
        self.logger.log(ConversationEvent::message(0, &message));
        self.transcript.push(message);
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn maximum_iterations(&self) -> usize {
        self.params.maximum_iterations
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id().clone()).collect()
    }

    /// Why the run ended, `None` while it is still running (or failed)
    pub fn outcome_reason(&self) -> Option<TerminationReason> {
        match self.state {
            RunState::Finished(reason) => Some(reason),
            RunState::Running | RunState::Failed => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.state, RunState::Running)
    }

    /// Take the next turn without progress reporting
    pub async fn next_turn(&mut self) -> Result<Option<Message>, RunGroupChatError> {
        self.next_turn_with_progress(&NoProgress).await
    }

    /// Take the next turn and return the appended message.
    ///
    /// Returns `Ok(None)` once the run has ended. A generation failure
    /// marks the run as failed and is returned unchanged inside
    /// [`RunGroupChatError::Generation`]; it is never retried here.
    pub async fn next_turn_with_progress(
        &mut self,
        progress: &dyn ChatProgressNotifier,
    ) -> Result<Option<Message>, RunGroupChatError> {
        if self.state != RunState::Running {
            return Ok(None);
        }

        if self.turns == 0 {
            info!(
                "Starting group chat with {} participants (max {} turns)",
                self.participants.len(),
                self.params.maximum_iterations
            );
            progress.on_chat_start(&self.participant_ids(), self.params.maximum_iterations);
        }

        let index = self
            .params
            .turn_order
            .next_index(self.turns, self.participants.len())
            .ok_or(RunGroupChatError::NoParticipants)?;
        let speaker = Arc::clone(&self.participants[index]);
        let speaker_id = speaker.id().clone();
        let turn = self.turns + 1;

        debug!("Turn {}: {}", turn, speaker_id);
        progress.on_turn_start(turn, &speaker_id);

        let on_chunk = |chunk: &str| progress.on_turn_chunk(&speaker_id, chunk);
        let generation = speaker.generate_next_streaming(&self.transcript, &on_chunk);
        let result = match self.params.turn_timeout {
            Some(limit) => tokio::time::timeout(limit, generation)
                .await
                .unwrap_or(Err(GatewayError::Timeout)),
            None => generation.await,
        };

        let message = match result {
            Ok(message) => message,
            Err(e) => {
                self.fail_turn(turn, &speaker_id, &e, progress);
                return Err(RunGroupChatError::Generation {
                    speaker: speaker_id,
                    turn,
                    source: e,
                });
            }
        };

        if message.author() != Some(&speaker_id) {
            let err = RunGroupChatError::MisattributedMessage {
                actual: message.speaker_label(),
                expected: speaker_id.clone(),
            };
            let reported = GatewayError::InvalidResponse(err.to_string());
            self.fail_turn(turn, &speaker_id, &reported, progress);
            return Err(err);
        }

        debug!(
            "{} said: {}",
            speaker_id,
            truncate(&message.text().unwrap_or_default(), 120)
        );
        self.transcript.push(message.clone());
        self.turns = turn;
        self.logger.log(ConversationEvent::message(turn, &message));
        progress.on_turn_complete(turn, &message);

        if self.strategy.should_terminate(&self.transcript) {
            self.finish(TerminationReason::Approved, progress);
        } else if self.turns >= self.params.maximum_iterations {
            self.finish(TerminationReason::TurnLimitReached, progress);
        }

        Ok(Some(message))
    }

    /// Mark the run failed and report the turn that broke it
    fn fail_turn(
        &mut self,
        turn: usize,
        speaker_id: &ParticipantId,
        error: &GatewayError,
        progress: &dyn ChatProgressNotifier,
    ) {
        warn!("{} failed on turn {}: {}", speaker_id, turn, error);
        self.state = RunState::Failed;
        progress.on_turn_failed(turn, speaker_id, error);
        self.logger.log(ConversationEvent::new(
            "turn_failed",
            json!({
                "turn": turn,
                "speaker": speaker_id.as_str(),
                "category": error.category(),
                "error": error.to_string(),
            }),
        ));
    }

    fn finish(&mut self, reason: TerminationReason, progress: &dyn ChatProgressNotifier) {
        info!("Group chat finished after {} turns: {}", self.turns, reason);
        self.state = RunState::Finished(reason);
        self.logger.log(ConversationEvent::new(
            "chat_complete",
            json!({ "reason": reason, "turns": self.turns }),
        ));
        progress.on_chat_complete(reason, self.turns);
    }

    /// Drive the chat to completion without progress reporting
    pub async fn run(self) -> Result<GroupChatOutcome, RunGroupChatError> {
        self.run_with_progress(&NoProgress).await
    }

    /// Drive the chat to completion
    pub async fn run_with_progress(
        mut self,
        progress: &dyn ChatProgressNotifier,
    ) -> Result<GroupChatOutcome, RunGroupChatError> {
        while self.next_turn_with_progress(progress).await?.is_some() {}
        self.into_outcome()
    }

    /// Consume a finished chat and return its outcome
    pub fn into_outcome(self) -> Result<GroupChatOutcome, RunGroupChatError> {
        match self.state {
            RunState::Finished(reason) => Ok(GroupChatOutcome {
                reason,
                turns: self.turns,
                transcript: self.transcript,
            }),
            RunState::Failed => Err(RunGroupChatError::AlreadyFailed),
            RunState::Running => Err(RunGroupChatError::NotFinished),
        }
    }

    /// The run as a lazy stream of appended messages, in transcript order
    pub fn into_stream(self) -> impl Stream<Item = Result<Message, RunGroupChatError>> {
        futures::stream::try_unfold(self, |mut chat| async move {
            Ok(chat.next_turn().await?.map(|message| (message, chat)))
        })
    }
}
