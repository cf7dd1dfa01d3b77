//! HTTP capability backed by the Anthropic Messages API.

use super::capability::{
    CapabilityError, CapabilityRequest, CapabilityResponse, FailureKind, GenerationCapability,
};
use crate::credentials::ApiKey;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

/// Messages API client. One `generate` call is one HTTP request.
pub struct AnthropicCapability {
    client: Client,
    api_key: ApiKey,
    base_url: String,
}

impl AnthropicCapability {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[async_trait]
impl GenerationCapability for AnthropicCapability {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        request: &CapabilityRequest,
    ) -> Result<CapabilityResponse, CapabilityError> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        debug!(model = %request.model, "sending request to Messages API");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CapabilityError::transient(format!("failed to read response body: {}", e)))?;

        if !(200..300).contains(&status) {
            return Err(CapabilityError {
                kind: classify_status(status),
                message: format!("Messages API returned {}: {}", status, truncate(&text, 500)),
            });
        }

        parse_messages_response(&text)
    }
}

/// Map an HTTP status to a failure kind.
///
/// 408, 409, 429 and every 5xx (including 529 "overloaded") are transient.
/// Other statuses mean the request or credentials are wrong.
pub fn classify_status(status: u16) -> FailureKind {
    match status {
        408 | 409 | 429 | 500..=599 => FailureKind::Transient,
        _ => FailureKind::Permanent,
    }
}

fn classify_transport_error(err: reqwest::Error) -> CapabilityError {
    if err.is_builder() {
        CapabilityError::permanent(format!("invalid request: {}", err))
    } else {
        CapabilityError::transient(format!("HTTP request failed: {}", err))
    }
}

/// Parse a successful Messages API body into the capability response shape.
///
/// Text blocks are concatenated in order. Anything else is a contract
/// violation.
pub fn parse_messages_response(body: &str) -> Result<CapabilityResponse, CapabilityError> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| CapabilityError::contract(format!("unexpected response shape: {}", e)))?;

    let mut text = String::new();
    let mut saw_text = false;
    for block in parsed.content.iter().filter(|b| b.kind == "text") {
        if let Some(t) = &block.text {
            text.push_str(t);
            saw_text = true;
        }
    }

    if !saw_text {
        return Err(CapabilityError::contract("response contains no text content"));
    }

    Ok(CapabilityResponse {
        text,
        input_tokens: parsed.usage.input_tokens,
        output_tokens: parsed.usage.output_tokens,
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(429), FailureKind::Transient);
        assert_eq!(classify_status(500), FailureKind::Transient);
        assert_eq!(classify_status(529), FailureKind::Transient);
        assert_eq!(classify_status(401), FailureKind::Permanent);
        assert_eq!(classify_status(400), FailureKind::Permanent);
        assert_eq!(classify_status(404), FailureKind::Permanent);
    }

    #[test]
    fn test_parse_messages_response() {
        let body = r#"{
            "id": "msg_01",
            "type": "message",
            "content": [
                {"type": "text", "text": "{\"solutions\": "},
                {"type": "text", "text": "[]}"}
            ],
            "usage": {"input_tokens": 1200, "output_tokens": 340}
        }"#;
        let response = parse_messages_response(body).unwrap();

        assert_eq!(response.text, "{\"solutions\": []}");
        assert_eq!(response.input_tokens, 1200);
        assert_eq!(response.output_tokens, 340);
    }

    #[test]
    fn test_missing_usage_is_contract_violation() {
        let body = r#"{"content": [{"type": "text", "text": "hi"}]}"#;
        let err = parse_messages_response(body).unwrap_err();
        assert_eq!(err.kind, FailureKind::ContractViolation);
    }

    #[test]
    fn test_no_text_block_is_contract_violation() {
        let body = r#"{"content": [{"type": "tool_use"}], "usage": {"input_tokens": 1, "output_tokens": 1}}"#;
        let err = parse_messages_response(body).unwrap_err();
        assert_eq!(err.kind, FailureKind::ContractViolation);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "model-x",
            max_tokens: 100,
            temperature: 0.5,
            system: None,
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "model-x");
        assert_eq!(json["max_tokens"], 100);
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
