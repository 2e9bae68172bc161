//! Model-backed participant
//!
//! [`LlmParticipant`] turns a transcript into a completion request for a
//! hosted model and wraps the reply as a message authored by itself.

use crate::ports::llm_gateway::{ChatMessage, CompletionRequest, GatewayError, LlmGateway};
use crate::ports::participant::Participant;
use async_trait::async_trait;
use groupchat_domain::{Content, ContentItem, Message, ParticipantId, PromptTemplate, Role, Transcript};
use std::sync::Arc;
use tracing::debug;

/// A participant whose turns are generated by a hosted chat model
pub struct LlmParticipant<G: LlmGateway + 'static> {
    id: ParticipantId,
    instructions: String,
    gateway: Arc<G>,
}

impl<G: LlmGateway + 'static> LlmParticipant<G> {
    pub fn new(id: ParticipantId, instructions: impl Into<String>, gateway: Arc<G>) -> Self {
        Self {
            id,
            instructions: instructions.into(),
            gateway,
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Build the request this participant sends for its next turn.
    ///
    /// The model only knows `user` and `assistant` roles, so the
    /// participant's own turns stay `assistant` while every other
    /// participant's turn is sent as `user`, prefixed with the speaker's
    /// name.
    pub fn build_request(&self, transcript: &Transcript) -> CompletionRequest {
        let messages = transcript
            .iter()
            .map(|message| self.to_chat_message(message))
            .collect();
        CompletionRequest::new(messages).with_system_prompt(self.instructions.clone())
    }

    fn to_chat_message(&self, message: &Message) -> ChatMessage {
        match (message.role(), message.author()) {
            (Role::Assistant, Some(author)) if author == &self.id => {
                ChatMessage::new(Role::Assistant, message.content().clone())
            }
            (Role::Assistant, _) => ChatMessage::new(
                Role::User,
                attribute(&message.speaker_label(), message.content()),
            ),
            (role, _) => ChatMessage::new(role, message.content().clone()),
        }
    }
}

/// Prefix the text of `content` with the speaker's name, keeping images
fn attribute(speaker: &str, content: &Content) -> Content {
    match content {
        Content::Text(text) => Content::Text(PromptTemplate::attributed(speaker, text)),
        Content::Image(image) => Content::Mixed(vec![
            ContentItem::Text(PromptTemplate::attributed(speaker, "(image)")),
            ContentItem::Image(image.clone()),
        ]),
        Content::Mixed(items) => Content::Mixed(
            items
                .iter()
                .map(|item| match item {
                    ContentItem::Text(text) => {
                        ContentItem::Text(PromptTemplate::attributed(speaker, text))
                    }
                    ContentItem::Image(image) => ContentItem::Image(image.clone()),
                })
                .collect(),
        ),
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> Participant for LlmParticipant<G> {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    async fn generate_next(&self, transcript: &Transcript) -> Result<Message, GatewayError> {
        let request = self.build_request(transcript);
        debug!(
            "{} generating from {} messages",
            self.id,
            request.messages.len()
        );
        let text = self.gateway.complete(&request).await?;
        Ok(Message::assistant(self.id.clone(), text))
    }

    async fn generate_next_streaming(
        &self,
        transcript: &Transcript,
        on_chunk: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> Result<Message, GatewayError> {
        let request = self.build_request(transcript);
        debug!(
            "{} streaming from {} messages",
            self.id,
            request.messages.len()
        );
        let handle = self.gateway.complete_streaming(&request).await?;
        let text = handle.collect_text_with(|chunk| on_chunk(chunk)).await?;
        Ok(Message::assistant(self.id.clone(), text))
    }
}
