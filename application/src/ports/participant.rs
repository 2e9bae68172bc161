//! Participant port
//!
//! A participant is an opaque capability: given the transcript so far it
//! produces the next message, attributed to itself. The driver never
//! inspects how.

use crate::ports::llm_gateway::GatewayError;
use async_trait::async_trait;
use groupchat_domain::{Message, ParticipantId, Transcript};

/// An agent that can take a turn in a group chat
#[async_trait]
pub trait Participant: Send + Sync {
    /// Identity used for turn selection and termination eligibility
    fn id(&self) -> &ParticipantId;

    /// Produce the next message given the transcript so far.
    ///
    /// The returned message must be authored by [`Participant::id`].
    async fn generate_next(&self, transcript: &Transcript) -> Result<Message, GatewayError>;

    /// Like [`generate_next`](Participant::generate_next) but reports text
    /// chunks through `on_chunk` while the reply is produced.
    ///
    /// Default implementation reports the whole reply as one chunk.
    async fn generate_next_streaming(
        &self,
        transcript: &Transcript,
        on_chunk: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> Result<Message, GatewayError> {
        let message = self.generate_next(transcript).await?;
        if let Some(text) = message.text() {
            on_chunk(&text);
        }
        Ok(message)
    }
}
