//! Azure OpenAI connection settings from TOML (`[azure_openai]` section)

use super::ConfigValidationError;
use crate::azure::{AzureCredential, AzureOpenAiSettings, DEFAULT_API_VERSION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";

/// How to authenticate against the resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAuthMethod {
    /// API key when one is configured, Azure CLI token otherwise
    #[default]
    Auto,
    ApiKey,
    AzureCli,
}

/// Raw `[azure_openai]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com/`
    pub endpoint: Option<String>,
    /// Chat model deployment name
    pub deployment_name: Option<String>,
    pub api_version: String,
    pub auth: FileAuthMethod,
    /// Inline API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset
    pub api_key_env: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Whole-request timeout for a single completion
    pub timeout_seconds: Option<u64>,
}

impl Default for FileAzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            deployment_name: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            auth: FileAuthMethod::Auto,
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        }
    }
}

impl FileAzureOpenAiConfig {
    fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn endpoint(&self) -> Option<&str> {
        Self::non_blank(&self.endpoint)
    }

    pub fn deployment_name(&self) -> Option<&str> {
        Self::non_blank(&self.deployment_name)
    }

    /// Inline key first, then the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        Self::non_blank(&self.api_key)
            .map(str::to_string)
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        match self.endpoint() {
            None => issues.push(ConfigValidationError::MissingEndpoint),
            Some(e) if !(e.starts_with("https://") || e.starts_with("http://")) => {
                issues.push(ConfigValidationError::InvalidEndpoint(e.to_string()))
            }
            Some(_) => {}
        }
        if self.deployment_name().is_none() {
            issues.push(ConfigValidationError::MissingDeployment);
        }
        if self.timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        issues
    }

    /// Gateway settings, once endpoint and deployment are known
    pub fn to_settings(&self) -> Result<AzureOpenAiSettings, ConfigValidationError> {
        let endpoint = self
            .endpoint()
            .ok_or(ConfigValidationError::MissingEndpoint)?;
        let deployment = self
            .deployment_name()
            .ok_or(ConfigValidationError::MissingDeployment)?;

        let mut settings = AzureOpenAiSettings::new(endpoint, deployment);
        settings.api_version = self.api_version.clone();
        settings.max_tokens = self.max_tokens;
        settings.temperature = self.temperature;
        settings.request_timeout = self.timeout_seconds.map(Duration::from_secs);
        Ok(settings)
    }

    pub fn credential(&self) -> Result<AzureCredential, ConfigValidationError> {
        match (self.auth, self.resolve_api_key()) {
            (FileAuthMethod::AzureCli, _) | (FileAuthMethod::Auto, None) => {
                Ok(AzureCredential::azure_cli())
            }
            (_, Some(key)) => Ok(AzureCredential::api_key(key)),
            (FileAuthMethod::ApiKey, None) => Err(ConfigValidationError::MissingApiKey(
                self.api_key_env.clone(),
            )),
        }
    }

    /// Copy safe to print: the inline key is masked
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}
