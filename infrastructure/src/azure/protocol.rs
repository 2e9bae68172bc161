//! Chat Completions wire format
//!
//! Request/response bodies for the Azure OpenAI `chat/completions` endpoint
//! and the server-sent-events framing used when `stream` is set.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use groupchat_application::{ChatMessage, CompletionRequest};
use groupchat_domain::{Content, ContentItem, ImageData, Role};
use serde::{Deserialize, Serialize};

// ==================== Request ====================

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<WireMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionRequest {
    pub fn from_request(request: &CompletionRequest, stream: bool) -> Self {
        let system = request
            .system_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| WireMessage {
                role: Role::System.as_str(),
                content: WireContent::Text(p.to_string()),
            });

        let messages = system
            .into_iter()
            .chain(request.messages.iter().map(WireMessage::from_chat_message))
            .collect();

        Self {
            messages,
            stream,
            max_tokens: None,
            temperature: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: WireContent,
}

impl WireMessage {
    fn from_chat_message(message: &ChatMessage) -> Self {
        let content = match &message.content {
            Content::Text(text) => WireContent::Text(text.clone()),
            Content::Image(image) => WireContent::Parts(vec![WirePart::image(image)]),
            Content::Mixed(items) => WireContent::Parts(
                items
                    .iter()
                    .map(|item| match item {
                        ContentItem::Text(text) => WirePart::Text { text: text.clone() },
                        ContentItem::Image(image) => WirePart::image(image),
                    })
                    .collect(),
            ),
        };
        Self {
            role: message.role.as_str(),
            content,
        }
    }
}

/// Plain string content, or a list of typed parts when images are involved
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WirePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl WirePart {
    fn image(image: &ImageData) -> Self {
        WirePart::ImageUrl {
            image_url: ImageUrl {
                url: data_url(image),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Encode an image as a `data:` URL
pub fn data_url(image: &ImageData) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type(),
        BASE64.encode(image.bytes())
    )
}

// ==================== Response ====================

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the model produced any
    pub fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[allow(dead_code)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

/// One streamed chunk. Azure sends chunks with empty `choices` (content
/// filter results) before the first delta.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    pub fn delta_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.finish_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[allow(dead_code)]
    pub code: Option<String>,
}

/// Pull the human-readable message out of an error body, falling back to
/// the raw body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// ==================== Server-sent events ====================

/// A decoded `data:` line
#[derive(Debug)]
pub enum SseData {
    Chunk(ChatCompletionChunk),
    Done,
}

/// Parse one SSE line. Comments, blank lines and non-data fields yield `None`.
pub fn parse_sse_line(line: &str) -> Option<Result<SseData, serde_json::Error>> {
    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(Ok(SseData::Done));
    }
    Some(serde_json::from_str(data).map(SseData::Chunk))
}

/// Splits a byte stream into complete lines.
///
/// Network chunks don't respect line boundaries, so partial lines are held
/// back until the rest arrives.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and drain every complete line (without the terminator)
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        }
        lines
    }

    /// Whatever is left once the stream ends
    pub fn finish(self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.pending).trim().to_string();
        (!rest.is_empty()).then_some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupchat_domain::Message;

    #[test]
    fn test_request_puts_system_prompt_first() {
        let request = CompletionRequest::new(vec![ChatMessage::text(Role::User, "hi")])
            .with_system_prompt("be brief");
        let wire = ChatCompletionRequest::from_request(&request, true);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_blank_system_prompt_is_skipped() {
        let request =
            CompletionRequest::new(vec![ChatMessage::text(Role::User, "hi")]).with_system_prompt(" ");
        let wire = ChatCompletionRequest::from_request(&request, false);
        assert_eq!(wire.messages.len(), 1);
    }

    #[test]
    fn test_image_becomes_data_url_part() {
        let msg = Message::user_with_image(
            ImageData::new(vec![1, 2, 3], "image/png"),
            Some("What is this?"),
        );
        let request =
            CompletionRequest::new(vec![ChatMessage::new(msg.role(), msg.content().clone())]);
        let json = serde_json::to_value(ChatCompletionRequest::from_request(&request, true)).unwrap();

        let parts = json["messages"][0]["content"].as_array().unwrap();
        let image = parts
            .iter()
            .find(|p| p["type"] == "image_url")
            .expect("image part");
        assert_eq!(image["image_url"]["url"], "data:image/png;base64,AQID");
        let text = parts.iter().find(|p| p["type"] == "text").expect("text part");
        assert_eq!(text["text"], "What is this?");
    }

    #[test]
    fn test_parse_sse_delta() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        match parse_sse_line(line) {
            Some(Ok(SseData::Chunk(chunk))) => assert_eq!(chunk.delta_text(), Some("Hel")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sse_filter_chunk_has_no_text() {
        let line = r#"data: {"choices":[],"prompt_filter_results":[]}"#;
        match parse_sse_line(line) {
            Some(Ok(SseData::Chunk(chunk))) => {
                assert!(chunk.delta_text().is_none());
                assert!(chunk.finish_reason().is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sse_done_and_noise() {
        assert!(matches!(parse_sse_line("data: [DONE]"), Some(Ok(SseData::Done))));
        assert!(parse_sse_line("").is_none());
        assert!(parse_sse_line(": keep-alive").is_none());
        assert!(parse_sse_line("event: ping").is_none());
        assert!(matches!(parse_sse_line("data: {oops"), Some(Err(_))));
    }

    #[test]
    fn test_line_buffer_joins_split_lines() {
        let mut buffer = SseLineBuffer::new();
        assert!(buffer.push(b"data: {\"a\"").is_empty());
        let lines = buffer.push(b":1}\r\n\r\ndata: [DONE]\n");
        assert_eq!(lines, vec!["data: {\"a\":1}", "", "data: [DONE]"]);
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn test_line_buffer_returns_trailing_data() {
        let mut buffer = SseLineBuffer::new();
        buffer.push(b"data: [DONE]");
        assert_eq!(buffer.finish().as_deref(), Some("data: [DONE]"));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"code":"DeploymentNotFound","message":"The API deployment for this resource does not exist."}}"#;
        assert_eq!(
            error_message(body),
            "The API deployment for this resource does not exist."
        );
        assert_eq!(error_message("  plain text \n"), "plain text");
    }

    #[test]
    fn test_response_text() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"APPROVED"},"finish_reason":"stop"}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("APPROVED"));
    }
}
