//! Anthropic Provider — implementation of [`AIProvider`] (C7) against
//! Anthropic's Messages API, including `tool_use` content blocks.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let provider = AnthropicProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::{Message, MessageRole, ToolCall, ToolDefinition, Usage};
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl From<&crate::config::AiConfig> for AnthropicConfig {
    /// Builds the adapter's own config from the typed `AiConfig`. Panics if
    /// no credential is configured; callers validate `AppConfig` before
    /// constructing a live provider (see `src/bin/server.rs`).
    fn from(ai: &crate::config::AiConfig) -> Self {
        let api_key = ai
            .anthropic_api_key
            .as_ref()
            .expect("AnthropicProvider requires an API key; validate AppConfig first")
            .expose_secret()
            .clone();
        Self {
            api_key: Secret::new(api_key),
            model: ai.model.clone(),
            base_url: ai.base_url.clone(),
            timeout: ai.timeout(),
            max_retries: ai.max_retries,
        }
    }
}

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let mut system = None;
        let mut messages = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            match message.role {
                MessageRole::System => {
                    system = Some(message.content.clone());
                }
                _ => messages.push(to_anthropic_message(message)),
            }
        }

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(request.tools.iter().map(ToolDefinition::to_anthropic_format).collect())
        };
        let tool_choice = tools.is_some().then(|| serde_json::json!({ "type": "auto" }));

        AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            system,
            max_tokens: request.max_tokens,
            tools,
            tool_choice,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let anthropic_request = self.to_anthropic_request(request);

        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("content-type", "application/json")
            .json(&anthropic_request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    AIError::Timeout { timeout_secs: self.config.timeout.as_secs() as u32 }
                } else {
                    AIError::Network(err.to_string())
                }
            })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::RateLimited { retry_after_secs: Self::parse_retry_after(&body) }),
            400..=499 => Err(AIError::ClientError { status: status.as_u16(), message: body }),
            500..=599 => Err(AIError::ServerError { status: status.as_u16(), message: body }),
            _ => Err(AIError::Unknown(format!("unexpected status {status}: {body}"))),
        }
    }

    /// Anthropic's 429 body tends to carry a human-readable "try again in Xs"
    /// hint; falls back to a conservative 60s otherwise.
    fn parse_retry_after(error_body: &str) -> u32 {
        if let Ok(parsed) = serde_json::from_str::<Value>(error_body) {
            if let Some(message) = parsed.get("error").and_then(|e| e.get("message")).and_then(Value::as_str) {
                if let Some(idx) = message.find("try again in ") {
                    let rest = &message[idx + "try again in ".len()..];
                    if let Some(end) = rest.find(|c: char| !c.is_ascii_digit()) {
                        if let Ok(secs) = rest[..end].parse::<u32>() {
                            return secs;
                        }
                    }
                }
            }
        }
        60
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;
        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|err| AIError::Parse(format!("failed to parse Anthropic response: {err}")))?;

        let mut message = String::new();
        let mut tool_calls = Vec::new();
        for block in parsed.content {
            match block {
                AnthropicContentBlock::Text { text } => message.push_str(&text),
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall::new(id, name, input.to_string()));
                }
                AnthropicContentBlock::ToolResult { .. } => {}
            }
        }

        Ok(CompletionResponse {
            message,
            tool_calls,
            usage: Usage::new(parsed.usage.input_tokens, parsed.usage.output_tokens),
        })
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn create_chat_completion(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut last_error = AIError::Unknown("no attempt made".to_string());
        let mut attempt = 0;

        while attempt <= self.config.max_retries {
            let outcome = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match outcome {
                Ok(completion) => return Ok(completion),
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            sleep(Duration::from_secs(1 << attempt)).await;
            attempt += 1;
        }

        Err(last_error)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo { name: "anthropic".to_string(), model: self.config.model.clone(), max_context_tokens: 200_000 }
    }
}

fn to_anthropic_message(message: &Message) -> AnthropicMessage {
    match message.role {
        MessageRole::Tool => AnthropicMessage {
            role: "user".to_string(),
            content: vec![AnthropicContentBlock::ToolResult {
                tool_use_id: message.tool_call_id.clone().unwrap_or_default(),
                content: message.content.clone(),
            }],
        },
        MessageRole::Assistant => {
            let mut content = Vec::new();
            if !message.content.is_empty() {
                content.push(AnthropicContentBlock::Text { text: message.content.clone() });
            }
            if let Some(tool_calls) = &message.tool_calls {
                for call in tool_calls {
                    content.push(AnthropicContentBlock::ToolUse {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.parsed_arguments().unwrap_or_else(|_| Value::Object(Default::default())),
                    });
                }
            }
            AnthropicMessage { role: "assistant".to_string(), content }
        }
        MessageRole::User | MessageRole::System => {
            AnthropicMessage { role: "user".to_string(), content: vec![AnthropicContentBlock::Text { text: message.content.clone() }] }
        }
    }
}

// ----- Anthropic API wire types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
    ToolResult { tool_use_id: String, content: String },
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_overrides_defaults() {
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-opus-20240229")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "claude-3-opus-20240229");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn provider_info_reports_anthropic_identity() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("test"));
        let info = provider.provider_info();
        assert_eq!(info.name, "anthropic");
        assert_eq!(info.max_context_tokens, 200_000);
    }

    #[test]
    fn assistant_message_with_tool_calls_becomes_tool_use_blocks() {
        let message = Message::assistant_with_tool_calls(
            "checking",
            vec![ToolCall::new("call_1", "list_widgets", "{}")],
        )
        .unwrap();
        let converted = to_anthropic_message(&message);
        assert_eq!(converted.role, "assistant");
        assert_eq!(converted.content.len(), 2);
        assert!(matches!(converted.content[0], AnthropicContentBlock::Text { .. }));
        assert!(matches!(converted.content[1], AnthropicContentBlock::ToolUse { .. }));
    }

    #[test]
    fn tool_message_becomes_tool_result_block_on_user_role() {
        let message = Message::tool_result("call_1", "{\"success\":true}").unwrap();
        let converted = to_anthropic_message(&message);
        assert_eq!(converted.role, "user");
        match &converted.content[0] {
            AnthropicContentBlock::ToolResult { tool_use_id, content } => {
                assert_eq!(tool_use_id, "call_1");
                assert_eq!(content, "{\"success\":true}");
            }
            _ => panic!("expected a tool_result block"),
        }
    }

    #[test]
    fn parse_retry_after_falls_back_to_sixty_seconds() {
        let body = r#"{"error":{"message":"Rate limit exceeded"}}"#;
        assert_eq!(AnthropicProvider::parse_retry_after(body), 60);
    }

    #[test]
    fn parse_retry_after_extracts_hint_from_message() {
        let body = r#"{"error":{"message":"rate limited, try again in 12s"}}"#;
        assert_eq!(AnthropicProvider::parse_retry_after(body), 12);
    }

    #[tokio::test]
    async fn response_with_tool_use_block_yields_tool_calls() {
        let response_json = serde_json::json!({
            "content": [
                {"type": "tool_use", "id": "call_1", "name": "list_widgets", "input": {}}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 7}
        });
        let parsed: AnthropicResponse = serde_json::from_value(response_json).unwrap();
        assert_eq!(parsed.content.len(), 1);
        assert_eq!(parsed.usage.input_tokens, 12);
    }
}
