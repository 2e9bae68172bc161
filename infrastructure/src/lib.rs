//! Infrastructure layer for vision-groupchat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Azure OpenAI gateway, configuration
//! file loading, image file ingestion and the JSONL transcript log.

pub mod azure;
pub mod config;
pub mod image;
pub mod logging;

// Re-export commonly used types
pub use azure::{AzureCredential, AzureError, AzureOpenAiGateway, AzureOpenAiSettings};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileAgentsConfig, FileAuthMethod,
    FileAzureOpenAiConfig, FileChatConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
};
pub use image::{ImageError, ImageLoader};
pub use logging::JsonlConversationLogger;
