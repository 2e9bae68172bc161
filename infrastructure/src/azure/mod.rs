//! Azure OpenAI adapter
//!
//! ```text
//! LlmParticipant ──▶ AzureOpenAiGateway ──POST──▶ {endpoint}/openai/deployments/{deployment}/chat/completions
//!                        │                              │
//!                        └── AzureCredential            └── SSE `data:` lines ──▶ StreamEvent
//!                            (api-key | az CLI token)
//! ```

pub mod credential;
pub mod error;
pub mod gateway;
pub mod protocol;

pub use credential::{AzureCliCredential, AzureCredential};
pub use error::AzureError;
pub use gateway::{AzureOpenAiGateway, AzureOpenAiSettings, DEFAULT_API_VERSION};
