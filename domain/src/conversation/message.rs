//! Conversation message entities

use super::image::ImageData;
use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a mixed message payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Text(String),
    Image(ImageData),
}

/// Message payload
///
/// Text is optional: an image-only message has no text at all, and
/// callers have to handle that through [`Content::text`] returning `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Image(ImageData),
    Mixed(Vec<ContentItem>),
}

impl Content {
    /// Text carried by this payload, if any.
    ///
    /// For mixed payloads the text items are joined with newlines.
    pub fn text(&self) -> Option<String> {
        match self {
            Content::Text(text) => Some(text.clone()),
            Content::Image(_) => None,
            Content::Mixed(items) => {
                let parts: Vec<&str> = items
                    .iter()
                    .filter_map(|item| match item {
                        ContentItem::Text(text) => Some(text.as_str()),
                        ContentItem::Image(_) => None,
                    })
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("\n"))
                }
            }
        }
    }

    /// Images carried by this payload, in order
    pub fn images(&self) -> Vec<&ImageData> {
        match self {
            Content::Text(_) => Vec::new(),
            Content::Image(image) => vec![image],
            Content::Mixed(items) => items
                .iter()
                .filter_map(|item| match item {
                    ContentItem::Image(image) => Some(image),
                    ContentItem::Text(_) => None,
                })
                .collect(),
        }
    }

    pub fn has_images(&self) -> bool {
        !self.images().is_empty()
    }
}

/// A message in a conversation (Entity)
///
/// Immutable once built: a [`Transcript`](super::transcript::Transcript)
/// only hands out shared references to the messages it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    author: Option<ParticipantId>,
    content: Content,
}

impl Message {
    pub fn new(role: Role, author: Option<ParticipantId>, content: Content) -> Self {
        Self {
            role,
            author,
            content,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, None, Content::Text(text.into()))
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, None, Content::Text(text.into()))
    }

    /// User message carrying only an image
    pub fn user_image(image: ImageData) -> Self {
        Self::new(Role::User, None, Content::Image(image))
    }

    /// User message carrying an image and an optional question
    pub fn user_with_image(image: ImageData, question: Option<&str>) -> Self {
        match question.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => Self::new(
                Role::User,
                None,
                Content::Mixed(vec![
                    ContentItem::Text(q.to_string()),
                    ContentItem::Image(image),
                ]),
            ),
            None => Self::user_image(image),
        }
    }

    /// Assistant message produced by a participant
    pub fn assistant(author: ParticipantId, text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Some(author), Content::Text(text.into()))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn author(&self) -> Option<&ParticipantId> {
        self.author.as_ref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Shortcut for [`Content::text`]
    pub fn text(&self) -> Option<String> {
        self.content.text()
    }

    /// Label used when rendering the message (author name or role)
    pub fn speaker_label(&self) -> String {
        match &self.author {
            Some(author) => author.to_string(),
            None => self.role.to_string(),
        }
    }
}
