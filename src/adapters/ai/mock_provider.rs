//! Mock AI Provider for testing (C7 test double).
//!
//! A configurable stand-in for [`AIProvider`] that lets tests script a
//! sequence of final answers, tool-call requests, or errors without calling
//! a real provider — the same role [`crate::adapters::ai::AnthropicProvider`]
//! plays in production.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::domain::conversation::{ToolCall, Usage};
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A final answer with no further tool calls.
    Text { message: String, usage: Usage },
    /// A response requesting one or more tool calls.
    ToolCalls { tool_calls: Vec<ToolCall>, usage: Usage },
    /// A provider-level failure.
    Error(MockError),
}

/// Mirrors [`AIError`]'s variants without requiring tests to construct the
/// real enum's non-`Clone` shape directly.
#[derive(Debug, Clone)]
pub enum MockError {
    QuotaExceeded,
    RateLimited { retry_after_secs: u32 },
    AuthenticationFailed,
    Network(String),
    ServerError { status: u16, message: String },
    ClientError { status: u16, message: String },
    Unknown(String),
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::QuotaExceeded => AIError::QuotaExceeded,
            MockError::RateLimited { retry_after_secs } => AIError::RateLimited { retry_after_secs },
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network(message) => AIError::Network(message),
            MockError::ServerError { status, message } => AIError::ServerError { status, message },
            MockError::ClientError { status, message } => AIError::ClientError { status, message },
            MockError::Unknown(message) => AIError::Unknown(message),
        }
    }
}

/// Configurable mock implementation of [`AIProvider`].
///
/// Responses are consumed in order; once exhausted, further calls return a
/// default final answer rather than panicking, so tests that don't care how
/// many iterations occur don't need to script every single one.
pub struct MockAIProvider {
    responses: Mutex<VecDeque<MockResponse>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            info: ProviderInfo {
                name: "mock".to_string(),
                model: "mock-model-1".to_string(),
                max_context_tokens: 128_000,
            },
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues a final text answer.
    pub fn with_response(self, message: impl Into<String>) -> Self {
        self.with_response_full(message, Usage::new(10, 20))
    }

    pub fn with_response_full(self, message: impl Into<String>, usage: Usage) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Text { message: message.into(), usage });
        self
    }

    /// Queues a tool-call request.
    pub fn with_tool_call(self, tool_call: ToolCall) -> Self {
        self.with_tool_calls(vec![tool_call])
    }

    pub fn with_tool_calls(self, tool_calls: Vec<ToolCall>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::ToolCalls { tool_calls, usage: Usage::new(20, 10) });
        self
    }

    /// Queues a provider-level error.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses.lock().unwrap().push_back(MockResponse::Error(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn next_response(&self) -> MockResponse {
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| MockResponse::Text {
            message: "Mock response".to_string(),
            usage: Usage::new(5, 10),
        })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn create_chat_completion(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Text { message, usage } => Ok(CompletionResponse { message, tool_calls: vec![], usage }),
            MockResponse::ToolCalls { tool_calls, usage } => {
                Ok(CompletionResponse { message: String::new(), tool_calls, usage })
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
