//! Configuration file loading for vision-groupchat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `GROUPCHAT_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./groupchat.toml` or `./.groupchat.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/vision-groupchat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, FileAgentConfig, FileAgentsConfig,
    FileAuthMethod, FileAzureOpenAiConfig, FileChatConfig, FileConfig, FileLoggingConfig,
    FileOutputConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
