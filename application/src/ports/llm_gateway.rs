//! LLM Gateway port
//!
//! Defines the interface for communicating with a hosted chat model.

use async_trait::async_trait;
use crate::ports::stream::StreamEvent;
use groupchat_domain::{Content, Role};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while generating a reply.
///
/// These are surfaced to the caller as-is; nothing in the application
/// layer retries them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Short category label used in logs and error output
    pub fn category(&self) -> &'static str {
        match self {
            GatewayError::Authentication(_) => "authentication",
            GatewayError::RateLimited(_) => "rate_limit",
            GatewayError::NotFound(_) => "not_found",
            GatewayError::ConnectionError(_) => "connection",
            GatewayError::RequestFailed(_) => "request",
            GatewayError::InvalidResponse(_) => "invalid_response",
            GatewayError::Timeout => "timeout",
            GatewayError::Other(_) => "other",
        }
    }
}

/// One message of a completion request, already mapped to model roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Content,
}

impl ChatMessage {
    pub fn new(role: Role, content: Content) -> Self {
        Self { role, content }
    }

    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, Content::Text(text.into()))
    }
}

/// A request for the next assistant message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Instructions sent as the system message
    pub system_prompt: Option<String>,
    /// Conversation so far, oldest first
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            system_prompt: None,
            messages,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Handle for receiving streaming events from a completion.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, GatewayError> {
        self.collect_text_with(|_| {}).await
    }

    /// Consume the stream, handing every delta to `on_chunk` as it arrives,
    /// and return the full text.
    pub async fn collect_text_with(
        mut self,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_chunk(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        on_chunk(&text);
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => return Err(e),
            }
        }
        // Producer went away without a terminal event
        Err(GatewayError::InvalidResponse(
            "stream closed before the reply completed".to_string(),
        ))
    }
}

/// Gateway for model communication
///
/// This port defines how the application layer talks to the hosted model.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a request and get the full reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;

    /// Send a request and get a streaming reply.
    ///
    /// Default implementation calls `complete()` and wraps the result in a
    /// single `Completed` event.
    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let result = self.complete(request).await?;
        let (tx, rx) = mpsc::channel(1);
        // If the receiver is dropped, that's fine
        let _ = tx.send(StreamEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_text_concatenates_deltas() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("Hel".to_string())).await.unwrap();
        tx.send(StreamEvent::Delta("lo".to_string())).await.unwrap();
        tx.send(StreamEvent::Completed("Hello".to_string()))
            .await
            .unwrap();
        drop(tx);

        let mut chunks = Vec::new();
        let text = StreamHandle::new(rx)
            .collect_text_with(|c| chunks.push(c.to_string()))
            .await
            .unwrap();
        assert_eq!(text, "Hello");
        assert_eq!(chunks, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn collect_text_uses_completed_when_no_deltas() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(StreamEvent::Completed("all at once".to_string()))
            .await
            .unwrap();
        let text = StreamHandle::new(rx).collect_text().await.unwrap();
        assert_eq!(text, "all at once");
    }

    #[tokio::test]
    async fn collect_text_surfaces_errors() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(StreamEvent::Error(GatewayError::Timeout))
            .await
            .unwrap();
        let err = StreamHandle::new(rx).collect_text().await.unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
        assert_eq!(err.category(), "timeout");
    }

    #[tokio::test]
    async fn collect_text_closed_channel_is_incomplete() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(StreamEvent::Delta("partial".to_string())).await.unwrap();
        drop(tx);
        let err = StreamHandle::new(rx).collect_text().await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn error_categories() {
        assert_eq!(GatewayError::Timeout.category(), "timeout");
        assert_eq!(
            GatewayError::Authentication("x".into()).category(),
            "authentication"
        );
    }
}
