//! Prompt templates

pub mod template;

pub use template::{PromptTemplate, REVIEW_AGENT_NAME, VISION_AGENT_NAME};
