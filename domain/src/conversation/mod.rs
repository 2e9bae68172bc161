//! Conversation domain
//!
//! Messages, their (possibly text-less) payloads, and the append-only
//! [`Transcript`](transcript::Transcript) a group chat run builds up.

pub mod image;
pub mod message;
pub mod transcript;

pub use image::{DEFAULT_IMAGE_MIME, ImageData, mime_type_for_extension};
pub use message::{Content, ContentItem, Message, Role};
pub use transcript::Transcript;
