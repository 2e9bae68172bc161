//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section lives in its own submodule; [`FileConfig`] ties them
//! together and validates the whole file.

mod agents;
mod azure;
mod chat;
mod logging;
mod output;

pub use agents::{FileAgentConfig, FileAgentsConfig};
pub use azure::{DEFAULT_API_KEY_ENV, FileAuthMethod, FileAzureOpenAiConfig};
pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("azure_openai.endpoint is not set")]
    MissingEndpoint,

    #[error("azure_openai.deployment_name is not set")]
    MissingDeployment,

    #[error("azure_openai.endpoint must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),

    #[error("auth = \"api_key\" but no key is configured (set api_key or ${0})")]
    MissingApiKey(String),

    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("chat.maximum_iterations must be at least 1")]
    ZeroIterations,

    #[error("chat.trigger_phrase cannot be empty")]
    EmptyTriggerPhrase,

    #[error("chat.authorized must name at least one agent")]
    EmptyAuthorized,

    #[error("chat.turn_order: unknown value '{0}' (valid: round_robin, fixed)")]
    InvalidTurnOrder(String),

    #[error("the vision and review agents must have different names ('{0}')")]
    DuplicateAgentNames(String),
}

impl ConfigValidationError {
    /// Whether this means the Azure resource was never set up, in which
    /// case a setup checklist is more useful than the bare error.
    pub fn is_setup_issue(&self) -> bool {
        matches!(
            self,
            ConfigValidationError::MissingEndpoint | ConfigValidationError::MissingDeployment
        )
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Azure OpenAI resource and deployment
    pub azure_openai: FileAzureOpenAiConfig,
    /// Agent names and instructions
    pub agents: FileAgentsConfig,
    /// Termination and turn settings
    pub chat: FileChatConfig,
    /// Terminal output
    pub output: FileOutputConfig,
    /// Diagnostic and transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = self.azure_openai.validate();
        issues.extend(self.chat.validate());

        let vision = self.agents.vision.name_or(groupchat_domain::VISION_AGENT_NAME);
        let review = self.agents.review.name_or(groupchat_domain::REVIEW_AGENT_NAME);
        if vision == review {
            issues.push(ConfigValidationError::DuplicateAgentNames(
                vision.to_string(),
            ));
        }

        issues
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        Self {
            azure_openai: self.azure_openai.redacted(),
            ..self.clone()
        }
    }

    /// The merged configuration as TOML, secrets masked (for --show-config)
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[azure_openai]
endpoint = "https://res.openai.azure.com/"
deployment_name = "gpt-4o"
auth = "azure_cli"

[chat]
maximum_iterations = 5
trigger_phrase = "LGTM"
authorized = ["ReviewAgent", "VisionAgent"]

[output]
color = false

[logging]
conversation_log = "chat.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.azure_openai.endpoint(),
            Some("https://res.openai.azure.com/")
        );
        assert_eq!(config.azure_openai.auth, FileAuthMethod::AzureCli);
        assert_eq!(config.chat.maximum_iterations, 5);
        assert_eq!(config.chat.trigger_phrase, "LGTM");
        assert_eq!(config.chat.authorized.as_ref().unwrap().len(), 2);
        assert!(!config.output.color);
        assert!(config.output.show_progress);
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some(std::path::Path::new("chat.jsonl"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config_needs_setup_only() {
        let issues = FileConfig::default().validate();
        assert!(!issues.is_empty());
        assert!(issues.iter().all(ConfigValidationError::is_setup_issue));
    }

    #[test]
    fn test_duplicate_agent_names() {
        let toml_str = r#"
[azure_openai]
endpoint = "https://res.openai.azure.com/"
deployment_name = "gpt-4o"

[agents.vision]
name = "ReviewAgent"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::DuplicateAgentNames(
                "ReviewAgent".to_string()
            )]
        );
    }

    #[test]
    fn test_toml_dump_masks_key_and_round_trips() {
        let mut config = FileConfig::default();
        config.azure_openai.api_key = Some("secret".to_string());
        config.chat.maximum_iterations = 7;

        let dumped = config.to_toml_string().unwrap();
        assert!(!dumped.contains("secret"));

        let parsed: FileConfig = toml::from_str(&dumped).unwrap();
        assert_eq!(parsed.chat.maximum_iterations, 7);
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let config: FileConfig = toml::from_str("[something_else]\nkey = 1\n").unwrap();
        assert_eq!(config, FileConfig::default());
    }
}
