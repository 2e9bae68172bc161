//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording conversation events
//! (appended messages, failures, run outcome) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! transcript in a machine-readable format (JSONL).

use groupchat_domain::{Content, ContentItem, Message};
use serde_json::{Value, json};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "message", "chat_complete").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// Event for a message appended at `turn` (0 for seed messages).
    ///
    /// Image bytes are not logged, only their MIME type and size.
    pub fn message(turn: usize, message: &Message) -> Self {
        let images: Vec<Value> = message
            .content()
            .images()
            .into_iter()
            .map(|image| json!({ "mime_type": image.mime_type(), "bytes": image.len() }))
            .collect();

        let kind = match message.content() {
            Content::Text(_) => "text",
            Content::Image(_) => "image",
            Content::Mixed(items) if items.iter().all(|i| matches!(i, ContentItem::Text(_))) => {
                "text"
            }
            Content::Mixed(_) => "mixed",
        };

        Self::new(
            "message",
            json!({
                "turn": turn,
                "role": message.role().as_str(),
                "author": message.author().map(|a| a.as_str()),
                "content_kind": kind,
                "text": message.text(),
                "images": images,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// The `log` method is synchronous and non-fallible so that logging
/// failures never disrupt the conversation; implementations drop errors.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupchat_domain::{ImageData, ParticipantId};

    #[test]
    fn message_event_omits_image_bytes() {
        let msg = Message::user_with_image(
            ImageData::new(vec![7u8; 10], "image/png"),
            Some("What is this?"),
        );
        let event = ConversationEvent::message(0, &msg);
        assert_eq!(event.event_type, "message");
        assert_eq!(event.payload["role"], "user");
        assert_eq!(event.payload["content_kind"], "mixed");
        assert_eq!(event.payload["text"], "What is this?");
        assert_eq!(event.payload["images"][0]["mime_type"], "image/png");
        assert_eq!(event.payload["images"][0]["bytes"], 10);
        assert!(event.payload["author"].is_null());
    }

    #[test]
    fn message_event_records_author() {
        let msg = Message::assistant(ParticipantId::new("ReviewAgent"), "APPROVED");
        let event = ConversationEvent::message(2, &msg);
        assert_eq!(event.payload["turn"], 2);
        assert_eq!(event.payload["author"], "ReviewAgent");
        assert_eq!(event.payload["content_kind"], "text");
    }
}
