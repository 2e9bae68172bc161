//! Error types for the Azure OpenAI adapter

use groupchat_application::GatewayError;
use thiserror::Error;

/// Result type alias for Azure OpenAI operations
pub type Result<T> = std::result::Result<T, AzureError>;

/// Errors that can occur when talking to Azure OpenAI
#[derive(Error, Debug)]
pub enum AzureError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl AzureError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AzureError::Timeout
        } else if e.is_connect() {
            AzureError::Connection(e.to_string())
        } else {
            AzureError::Stream(e.to_string())
        }
    }
}

impl From<AzureError> for GatewayError {
    fn from(e: AzureError) -> Self {
        match e {
            AzureError::Http { status, message } => match status {
                401 | 403 => GatewayError::Authentication(message),
                404 => GatewayError::NotFound(message),
                429 => GatewayError::RateLimited(message),
                _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status, message)),
            },
            AzureError::Connection(msg) => GatewayError::ConnectionError(msg),
            AzureError::Timeout => GatewayError::Timeout,
            AzureError::ParseError { error, .. } => GatewayError::InvalidResponse(error),
            AzureError::Stream(msg) => GatewayError::RequestFailed(msg),
            AzureError::Credential(msg) => GatewayError::Authentication(msg),
            e @ (AzureError::ClientBuild(_) | AzureError::InvalidEndpoint(_)) => {
                GatewayError::Other(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> GatewayError {
        AzureError::Http {
            status,
            message: "nope".to_string(),
        }
        .into()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(http(401), GatewayError::Authentication("nope".to_string()));
        assert_eq!(http(403), GatewayError::Authentication("nope".to_string()));
        assert_eq!(http(404), GatewayError::NotFound("nope".to_string()));
        assert_eq!(http(429), GatewayError::RateLimited("nope".to_string()));
        assert_eq!(
            http(500),
            GatewayError::RequestFailed("HTTP 500: nope".to_string())
        );
    }

    #[test]
    fn test_credential_error_is_authentication() {
        let err: GatewayError = AzureError::Credential("az not logged in".to_string()).into();
        assert_eq!(err.category(), "authentication");
    }

    #[test]
    fn test_timeout_maps_to_timeout() {
        let err: GatewayError = AzureError::Timeout.into();
        assert_eq!(err, GatewayError::Timeout);
    }
}
