//! Single-agent question/answer session over one image
//!
//! Each question runs a one-turn [`GroupChat`] with a single participant.
//! The session keeps the history between questions so follow-ups can
//! refer to earlier answers.

use crate::config::ChatParams;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::participant::Participant;
use crate::ports::progress::{ChatProgressNotifier, NoProgress};
use crate::use_cases::run_group_chat::{GroupChat, RunGroupChatError};
use groupchat_domain::{ImageData, Message, PromptTemplate, TurnOrder, Transcript};
use std::sync::Arc;
use tracing::debug;

/// Explicit session state for the interactive ask mode
pub struct AskSession {
    participant: Arc<dyn Participant>,
    image: ImageData,
    transcript: Transcript,
    params: ChatParams,
    logger: Arc<dyn ConversationLogger>,
}

impl AskSession {
    pub fn new(participant: Arc<dyn Participant>, image: ImageData) -> Self {
        Self {
            participant,
            image,
            transcript: Transcript::new(),
            params: ChatParams::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Use these parameters for each answer (turn cap and order are fixed
    /// to a single turn by the first participant).
    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// History of questions and answers so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Number of answered questions
    pub fn answered(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.author() == Some(self.participant.id()))
            .count()
    }

    pub async fn ask(&mut self, question: &str) -> Result<Message, RunGroupChatError> {
        self.ask_with_progress(question, &NoProgress).await
    }

    /// Ask one question and return the answer.
    ///
    /// The image goes along with the first question only. A blank
    /// question falls back to a generic "describe this image" prompt. On
    /// failure the session history is left untouched, so the same
    /// question can simply be asked again.
    pub async fn ask_with_progress(
        &mut self,
        question: &str,
        progress: &dyn ChatProgressNotifier,
    ) -> Result<Message, RunGroupChatError> {
        let question = match question.trim() {
            "" => PromptTemplate::default_question(),
            q => q,
        };

        let user_message = if self.transcript.is_empty() {
            Message::user_with_image(self.image.clone(), Some(question))
        } else {
            Message::user(question)
        };

        let params = self
            .params
            .clone()
            .with_maximum_iterations(1)
            .with_turn_order(TurnOrder::Fixed);

        let mut chat = GroupChat::new(
            vec![Arc::clone(&self.participant)],
            |_: &Transcript| false,
            params,
        )?
        .with_transcript(self.transcript.clone())
        .with_logger(Arc::clone(&self.logger));
        chat.add_message(user_message);

        // A one-turn chat finishes on its first turn
        let answer = chat.next_turn_with_progress(progress).await?;
        let outcome = chat.into_outcome()?;
        let Some(answer) = answer else {
            return Err(RunGroupChatError::NotFinished);
        };
        debug!("Answered question {}", self.answered() + 1);

        self.transcript = outcome.transcript;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use groupchat_domain::{Content, ParticipantId, Role};
    use std::sync::Mutex;

    struct EchoParticipant {
        id: ParticipantId,
        fail_next: Mutex<bool>,
        seen: Mutex<Vec<Transcript>>,
    }

    impl EchoParticipant {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                id: ParticipantId::new("VisionAgent"),
                fail_next: Mutex::new(false),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Participant for EchoParticipant {
        fn id(&self) -> &ParticipantId {
            &self.id
        }

        async fn generate_next(&self, transcript: &Transcript) -> Result<Message, GatewayError> {
            self.seen.lock().unwrap().push(transcript.clone());
            if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
                return Err(GatewayError::RateLimited("429".to_string()));
            }
            let question = transcript.last().and_then(|m| m.text()).unwrap_or_default();
            Ok(Message::assistant(self.id.clone(), format!("answer to {}", question)))
        }
    }

    fn image() -> ImageData {
        ImageData::new(vec![0xff, 0xd8, 0xff], "image/jpeg")
    }

    #[tokio::test]
    async fn first_question_carries_image() {
        let agent = EchoParticipant::new();
        let mut session = AskSession::new(agent.clone(), image());

        let answer = session.ask("What is shown?").await.unwrap();
        assert_eq!(answer.text().as_deref(), Some("answer to What is shown?"));

        let first = &session.transcript().messages()[0];
        assert_eq!(first.role(), Role::User);
        assert!(first.content().has_images());
        assert_eq!(session.answered(), 1);
    }

    #[tokio::test]
    async fn follow_ups_keep_history_without_resending_image() {
        let agent = EchoParticipant::new();
        let mut session = AskSession::new(agent.clone(), image());

        session.ask("first").await.unwrap();
        session.ask("second").await.unwrap();

        assert_eq!(session.transcript().len(), 4);
        assert!(matches!(
            session.transcript().messages()[2].content(),
            Content::Text(_)
        ));
        // The second call saw the whole first exchange
        let seen = agent.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 3);
        assert_eq!(session.answered(), 2);
    }

    #[tokio::test]
    async fn blank_question_uses_default_prompt() {
        let agent = EchoParticipant::new();
        let mut session = AskSession::new(agent, image());
        let answer = session.ask("   ").await.unwrap();
        assert_eq!(
            answer.text(),
            Some(format!("answer to {}", PromptTemplate::default_question()))
        );
    }

    #[tokio::test]
    async fn failure_leaves_history_untouched() {
        let agent = EchoParticipant::new();
        let mut session = AskSession::new(agent.clone(), image());
        session.ask("first").await.unwrap();

        *agent.fail_next.lock().unwrap() = true;
        let err = session.ask("second").await.unwrap_err();
        assert_eq!(
            err.generation_error(),
            Some(&GatewayError::RateLimited("429".to_string()))
        );
        assert_eq!(session.transcript().len(), 2);

        // Retrying the same question works
        let answer = session.ask("second").await.unwrap();
        assert_eq!(answer.text().as_deref(), Some("answer to second"));
        assert_eq!(session.transcript().len(), 4);
    }

    #[tokio::test]
    async fn answer_is_last_transcript_entry() {
        let agent = EchoParticipant::new();
        let mut session = AskSession::new(agent, image());
        let answer = session.ask("colour?").await.unwrap();
        assert_eq!(session.transcript().last(), Some(&answer));
    }
}
