//! Credentials for Azure OpenAI
//!
//! Either a static `api-key`, or an Entra ID bearer token obtained from the
//! Azure CLI (`az account get-access-token`) and cached until shortly
//! before it expires.

use super::error::{AzureError, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

/// Token audience for Azure OpenAI / Cognitive Services
pub const COGNITIVE_SERVICES_RESOURCE: &str = "https://cognitiveservices.azure.com";

/// Refresh this long before the reported expiry
const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// How requests are authenticated
pub enum AzureCredential {
    ApiKey(String),
    AzureCli(AzureCliCredential),
}

impl AzureCredential {
    pub fn api_key(key: impl Into<String>) -> Self {
        AzureCredential::ApiKey(key.into())
    }

    pub fn azure_cli() -> Self {
        AzureCredential::AzureCli(AzureCliCredential::new(COGNITIVE_SERVICES_RESOURCE))
    }

    /// Header name and value to attach to each request
    pub async fn header(&self) -> Result<(&'static str, String)> {
        match self {
            AzureCredential::ApiKey(key) => Ok(("api-key", key.clone())),
            AzureCredential::AzureCli(cli) => {
                let token = cli.token().await?;
                Ok(("Authorization", format!("Bearer {}", token)))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AzureCredential::ApiKey(_) => "api_key",
            AzureCredential::AzureCli(_) => "azure_cli",
        }
    }
}

impl std::fmt::Debug for AzureCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AzureCredential").field(&self.kind()).finish()
    }
}

/// A bearer token with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token is still good at `now`, leaving a refresh margin
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::minutes(EXPIRY_MARGIN_MINUTES) < self.expires_on
    }
}

/// Token source backed by the Azure CLI login
pub struct AzureCliCredential {
    resource: String,
    cached: Mutex<Option<AccessToken>>,
}

impl AzureCliCredential {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            cached: Mutex::new(None),
        }
    }

    /// Return a cached token or fetch a new one
    pub async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_fresh(Utc::now())
        {
            return Ok(token.token.clone());
        }

        let token = self.fetch().await?;
        debug!("Acquired Azure CLI token, expires {}", token.expires_on);
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch(&self) -> Result<AccessToken> {
        let program = if cfg!(windows) { "az.cmd" } else { "az" };
        let output = Command::new(program)
            .args([
                "account",
                "get-access-token",
                "--output",
                "json",
                "--resource",
                &self.resource,
            ])
            .output()
            .await
            .map_err(|e| {
                AzureError::Credential(format!(
                    "could not run the Azure CLI ({}): {}. Install it and run 'az login'",
                    program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AzureError::Credential(format!(
                "'az account get-access-token' failed: {}. Run 'az login' first",
                stderr.trim()
            )));
        }

        parse_cli_token(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenOutput {
    access_token: String,
    /// Local time, e.g. "2024-05-01 12:34:56.000000"
    expires_on: Option<String>,
    /// Unix seconds (newer CLI versions)
    #[serde(rename = "expires_on")]
    expires_on_unix: Option<i64>,
}

/// Parse the JSON printed by `az account get-access-token`
pub fn parse_cli_token(stdout: &str) -> Result<AccessToken> {
    let raw: CliTokenOutput = serde_json::from_str(stdout).map_err(|e| AzureError::ParseError {
        error: e.to_string(),
        raw: stdout.to_string(),
    })?;

    let expires_on = raw
        .expires_on_unix
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .or_else(|| raw.expires_on.as_deref().and_then(parse_local_timestamp))
        .ok_or_else(|| {
            AzureError::Credential("Azure CLI token has no usable expiry".to_string())
        })?;

    Ok(AccessToken {
        token: raw.access_token,
        expires_on,
    })
}

fn parse_local_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
