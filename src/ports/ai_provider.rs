//! AI Provider Port (C7) — a single operation: given a message list and an
//! optional tool catalog, return either a final message or tool-call
//! requests, plus token usage. Provider errors are normalized into a fixed
//! set of classes so the orchestrator never has to know which provider is
//! behind the port.

use async_trait::async_trait;

use crate::domain::conversation::{Message, ToolCall, ToolDefinition, Usage};

/// Default max_tokens applied to a request when the caller doesn't override it.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Request for a chat completion, with tool auto-selection enabled whenever
/// `tools` is non-empty.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn tools_enabled(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// Response from a chat completion. `tool_calls` is empty when the model
/// returned a final answer with no further tool requests.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Usage,
}

impl CompletionResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Static provider identity, useful for logging and diagnostics.
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub max_context_tokens: u32,
}

/// Normalized provider error classes.
///
/// Every concrete adapter maps its wire-level failures onto one of these so
/// the HTTP layer can always answer with the same generic 503 message while
/// logs retain the original detail.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("quota exceeded")]
    QuotaExceeded,

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("provider server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("invalid request ({status}): {message}")]
    ClientError { status: u16, message: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("unknown provider error: {0}")]
    Unknown(String),
}

impl AIError {
    /// The normalized error tag from spec. §4.7.
    pub fn error_code(&self) -> &'static str {
        match self {
            AIError::QuotaExceeded => "QUOTA_EXCEEDED",
            AIError::RateLimited { .. } => "RATE_LIMITED",
            AIError::AuthenticationFailed => "AUTH_ERROR",
            AIError::Network(_) | AIError::Timeout { .. } => "NETWORK_ERROR",
            AIError::ServerError { .. } => "SERVER_ERROR",
            AIError::ClientError { .. } => "CLIENT_ERROR",
            AIError::Parse(_) => "UNKNOWN_ERROR",
            AIError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Stable, human-readable message safe to show to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            AIError::QuotaExceeded => "AI service quota exceeded",
            AIError::RateLimited { .. } => "AI service is rate limiting requests",
            AIError::AuthenticationFailed => "AI service authentication failed",
            AIError::Network(_) | AIError::Timeout { .. } => "AI service network error",
            AIError::ServerError { .. } => "AI service is temporarily unavailable",
            AIError::ClientError { .. } => "AI service rejected the request",
            AIError::Parse(_) | AIError::Unknown(_) => "AI service returned an unexpected response",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::ServerError { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

/// Port for LLM chat-completion providers.
#[async_trait]
pub trait AIProvider: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, AIError>;

    fn provider_info(&self) -> ProviderInfo;
}
