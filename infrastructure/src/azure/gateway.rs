//! Azure OpenAI implementation of the LLM gateway port

use super::credential::AzureCredential;
use super::error::{AzureError, Result};
use super::protocol::{
    ChatCompletionRequest, ChatCompletionResponse, SseData, SseLineBuffer, error_message,
    parse_sse_line,
};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use groupchat_application::{
    CompletionRequest, GatewayError, LlmGateway, StreamEvent, StreamHandle,
};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default REST API version for chat completions
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Connection settings for one Azure OpenAI deployment
#[derive(Debug, Clone, PartialEq)]
pub struct AzureOpenAiSettings {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com/`
    pub endpoint: String,
    /// Deployment name (the model deployment, not the model family)
    pub deployment: String,
    pub api_version: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Whole-request timeout
    pub request_timeout: Option<Duration>,
}

impl AzureOpenAiSettings {
    pub fn new(endpoint: impl Into<String>, deployment: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            max_tokens: None,
            temperature: None,
            request_timeout: None,
        }
    }

    /// Full chat completions URL for this deployment
    pub fn completions_url(&self) -> Result<String> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(AzureError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.deployment.trim().is_empty() {
            return Err(AzureError::InvalidEndpoint(
                "deployment name is empty".to_string(),
            ));
        }
        Ok(format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint,
            self.deployment.trim(),
            self.api_version
        ))
    }
}

/// LLM gateway talking to an Azure OpenAI chat deployment
pub struct AzureOpenAiGateway {
    client: Client,
    url: String,
    settings: AzureOpenAiSettings,
    credential: AzureCredential,
}

impl AzureOpenAiGateway {
    pub fn new(settings: AzureOpenAiSettings, credential: AzureCredential) -> Result<Self> {
        let url = settings.completions_url()?;
        let mut builder = Client::builder().connect_timeout(Duration::from_secs(30));
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AzureError::ClientBuild(e.to_string()))?;

        debug!(
            "Azure OpenAI gateway for deployment '{}' ({} auth)",
            settings.deployment,
            credential.kind()
        );

        Ok(Self {
            client,
            url,
            settings,
            credential,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.settings.deployment
    }

    fn body(&self, request: &CompletionRequest, stream: bool) -> ChatCompletionRequest {
        let mut body = ChatCompletionRequest::from_request(request, stream);
        body.max_tokens = self.settings.max_tokens;
        body.temperature = self.settings.temperature;
        body
    }

    /// POST the request and return the response once the status is known good
    async fn send(&self, body: &ChatCompletionRequest) -> Result<reqwest::Response> {
        let (header, value) = self.credential.header().await?;

        let response = self
            .client
            .post(&self.url)
            .header(header, value)
            .json(body)
            .send()
            .await
            .map_err(AzureError::from_reqwest)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        warn!("Azure OpenAI returned HTTP {}: {}", status.as_u16(), message);
        Err(AzureError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn complete_inner(&self, request: &CompletionRequest) -> Result<String> {
        let response = self.send(&self.body(request, false)).await?;
        let raw = response.text().await.map_err(AzureError::from_reqwest)?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&raw).map_err(|e| AzureError::ParseError {
                error: e.to_string(),
                raw: raw.clone(),
            })?;
        parsed.into_text().ok_or_else(|| AzureError::ParseError {
            error: "response has no message content".to_string(),
            raw,
        })
    }
}

#[async_trait]
impl LlmGateway for AzureOpenAiGateway {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, GatewayError> {
        Ok(self.complete_inner(request).await?)
    }

    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<StreamHandle, GatewayError> {
        let response = self.send(&self.body(request, true)).await?;
        Ok(spawn_pump(response.bytes_stream()))
    }
}

/// Pump an SSE byte stream on a background task and hand back the receiving end
fn spawn_pump<S, B>(bytes: S) -> StreamHandle
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send,
{
    let (tx, rx) = mpsc::channel(64);

    tokio::spawn(async move {
        let event = match pump_sse(bytes, &tx).await {
            Ok(text) => StreamEvent::Completed(text),
            Err(e) => {
                warn!("Azure OpenAI stream failed: {}", e);
                StreamEvent::Error(e.into())
            }
        };
        // Receiver may be gone if the turn was cancelled
        let _ = tx.send(event).await;
    });

    StreamHandle::new(rx)
}

/// Forward SSE deltas to `tx` and return the full text.
///
/// The reply only counts as complete once `data: [DONE]` arrived.
async fn pump_sse<S, B>(bytes: S, tx: &mpsc::Sender<StreamEvent>) -> Result<String>
where
    S: Stream<Item = reqwest::Result<B>>,
    B: AsRef<[u8]>,
{
    let mut bytes = std::pin::pin!(bytes);
    let mut buffer = SseLineBuffer::new();
    let mut full_text = String::new();

    while let Some(chunk) = bytes.next().await {
        let chunk = chunk.map_err(AzureError::from_reqwest)?;
        for line in buffer.push(chunk.as_ref()) {
            if handle_line(&line, &mut full_text, tx).await? {
                return Ok(full_text);
            }
        }
    }

    if let Some(line) = buffer.finish()
        && handle_line(&line, &mut full_text, tx).await?
    {
        return Ok(full_text);
    }
    debug!("stream closed after {} chars without [DONE]", full_text.len());
    Err(AzureError::Stream("stream ended before [DONE]".to_string()))
}

/// Returns `true` once the stream signalled its end
async fn handle_line(
    line: &str,
    full_text: &mut String,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<bool> {
    match parse_sse_line(line) {
        None => Ok(false),
        Some(Ok(SseData::Done)) => Ok(true),
        Some(Ok(SseData::Chunk(chunk))) => {
            if let Some(text) = chunk.delta_text() {
                full_text.push_str(text);
                if tx.send(StreamEvent::Delta(text.to_string())).await.is_err() {
                    return Err(AzureError::Stream("receiver dropped".to_string()));
                }
            }
            if let Some(reason) = chunk.finish_reason()
                && reason == "content_filter"
            {
                return Err(AzureError::Stream(
                    "response was blocked by the content filter".to_string(),
                ));
            }
            Ok(false)
        }
        Some(Err(e)) => Err(AzureError::ParseError {
            error: e.to_string(),
            raw: line.to_string(),
        }),
    }
}
