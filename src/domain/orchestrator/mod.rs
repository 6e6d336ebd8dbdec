//! Chat Orchestrator (C8): the bounded iterative tool-calling loop.
//!
//! This is the heart of the crate. Given a user message, prior history, and a
//! request-scoped [`Context`], it composes a conversation, calls the
//! [`AIProvider`] with the tool catalog, dispatches any requested tool calls
//! through the [`ToolRegistry`], feeds results back, and repeats until the
//! model returns a final answer or [`MAX_TOOL_ITERATIONS`] is reached.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::conversation::{Context, Message, MessageRole, ToolCall, ToolOutput, ToolResult, Usage, WidgetSummary};
use crate::domain::prompt::build_system_prompt;
use crate::domain::tools::ToolRegistry;
use crate::ports::{AIError, AIProvider, CompletionRequest};

/// Maximum number of LLM round-trips per request before the loop forces a
/// final, tools-disabled answer.
pub const MAX_TOOL_ITERATIONS: u32 = 10;

/// Wall-clock deadline for an entire chat request, measured from the moment
/// [`ChatOrchestrator::process_chat`] starts.
pub const MAX_WORKFLOW_TIME_MS: u64 = 5 * 60 * 1000;

/// History is truncated to the most recent entries before being sent to the
/// provider, preserving recency without bounding what the caller may submit.
pub const STORAGE_MESSAGE_LIMIT: usize = 200;

/// Maximum accepted length of the incoming user message.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Maximum accepted length of the incoming chat history, before truncation.
pub const MAX_HISTORY_LEN: usize = 300;

/// Input to one orchestrator run.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub chat_history: Vec<Message>,
    pub database_path: Option<String>,
    pub widgets: Vec<WidgetSummary>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            chat_history: Vec::new(),
            database_path: None,
            widgets: Vec::new(),
        }
    }

    pub fn with_history(mut self, chat_history: Vec<Message>) -> Self {
        self.chat_history = chat_history;
        self
    }

    pub fn with_database_path(mut self, database_path: impl Into<String>) -> Self {
        self.database_path = Some(database_path.into());
        self
    }

    pub fn with_widgets(mut self, widgets: Vec<WidgetSummary>) -> Self {
        self.widgets = widgets;
        self
    }
}

/// Outcome of a completed orchestrator run.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub message: String,
    pub usage: Usage,
    pub tool_results: Vec<ToolResult>,
    pub iterations: u32,
    pub reached_max_iterations: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("{0}")]
    Validation(String),

    #[error("AI service temporarily unavailable")]
    AdapterUnavailable(#[source] AIError),

    #[error("Request timed out - workflow took too long to complete")]
    Timeout,
}

/// Drives the iterative tool-calling loop for one chat request.
///
/// Holds process-wide, read-only collaborators (the AI provider and the tool
/// registry) — cheap to clone and safe to share across concurrent requests,
/// since every mutable piece of state (`messages`, `iteration`, `total_usage`,
/// `all_tool_results`) lives on the stack of a single `process_chat` call.
#[derive(Clone)]
pub struct ChatOrchestrator {
    provider: Arc<dyn AIProvider>,
    registry: Arc<ToolRegistry>,
}

impl ChatOrchestrator {
    pub fn new(provider: Arc<dyn AIProvider>, registry: Arc<ToolRegistry>) -> Self {
        Self { provider, registry }
    }

    pub async fn process_chat(&self, request: ChatRequest) -> Result<ChatResponse, OrchestratorError> {
        Self::validate_request(&request)?;

        let start = Instant::now();
        let deadline = Duration::from_millis(MAX_WORKFLOW_TIME_MS);
        let today = chrono::Utc::now().date_naive();

        let system_prompt = build_system_prompt(&self.registry, today);
        let truncated_history = truncate_history(&request.chat_history);

        let mut messages = Vec::with_capacity(truncated_history.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(truncated_history.iter().cloned());
        messages.push(Message::user(request.message.clone()));

        let context = Context::new(request.database_path.clone(), request.widgets.clone());
        let tool_definitions = self.registry.definitions();

        let mut iteration = 0u32;
        let mut total_usage = Usage::default();
        let mut all_tool_results = Vec::new();

        loop {
            if iteration >= MAX_TOOL_ITERATIONS {
                break;
            }
            if start.elapsed() >= deadline {
                tracing::error!(iteration, "chat request exceeded workflow deadline");
                return Err(OrchestratorError::Timeout);
            }
            iteration += 1;

            let span = tracing::debug_span!("chat_iteration", iteration);
            let _enter = span.enter();

            let completion_request = CompletionRequest::new(messages.clone()).with_tools(tool_definitions.clone());
            let response = self
                .provider
                .create_chat_completion(completion_request)
                .await
                .map_err(OrchestratorError::AdapterUnavailable)?;
            total_usage.accumulate(response.usage);

            if !response.has_tool_calls() {
                return Ok(ChatResponse {
                    message: response.message,
                    usage: total_usage,
                    tool_results: all_tool_results,
                    iterations: iteration,
                    reached_max_iterations: false,
                });
            }

            let assistant_message = Message::assistant_with_tool_calls(response.message, response.tool_calls.clone())
                .expect("response.tool_calls is non-empty: has_tool_calls() just returned true");
            messages.push(assistant_message);

            for tool_call in &response.tool_calls {
                let output = self.dispatch_tool_call(tool_call, &context).await;
                tracing::debug!(tool_name = %tool_call.name, success = output.is_success(), "tool dispatched");

                let tool_message = Message::tool_result(
                    tool_call.id.clone(),
                    serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string()),
                )
                .expect("serialized ToolOutput is never empty");
                messages.push(tool_message);
                all_tool_results.push(ToolResult::new(tool_call.id.clone(), output));
            }
        }

        tracing::warn!(iterations = MAX_TOOL_ITERATIONS, "reached max tool iterations, forcing final answer");
        let final_request = CompletionRequest::new(messages);
        let final_response = self
            .provider
            .create_chat_completion(final_request)
            .await
            .map_err(OrchestratorError::AdapterUnavailable)?;
        total_usage.accumulate(final_response.usage);

        Ok(ChatResponse {
            message: final_response.message,
            usage: total_usage,
            tool_results: all_tool_results,
            iterations: MAX_TOOL_ITERATIONS,
            reached_max_iterations: true,
        })
    }

    async fn dispatch_tool_call(&self, tool_call: &ToolCall, context: &Context) -> ToolOutput {
        let args = match tool_call.parsed_arguments() {
            Ok(args) => args,
            Err(err) => {
                return ToolOutput::failure(
                    "parse_error",
                    format!("Failed to parse arguments for tool '{}': {err}", tool_call.name),
                )
            }
        };

        let Some(tool) = self.registry.get(&tool_call.name) else {
            return ToolOutput::failure("tool_error", format!("Tool '{}' not found", tool_call.name));
        };

        if let Err(err) = tool.validate_parameters(&args) {
            return ToolOutput::failure("validation_error", err);
        }

        tool.execute(args, context).await
    }

    fn validate_request(request: &ChatRequest) -> Result<(), OrchestratorError> {
        if request.message.trim().is_empty() {
            return Err(OrchestratorError::Validation("message is required".to_string()));
        }
        if request.message.chars().count() > MAX_MESSAGE_LEN {
            return Err(OrchestratorError::Validation(format!(
                "message must be at most {MAX_MESSAGE_LEN} characters"
            )));
        }
        if request.chat_history.len() > MAX_HISTORY_LEN {
            return Err(OrchestratorError::Validation(format!(
                "chatHistory must contain at most {MAX_HISTORY_LEN} entries"
            )));
        }
        for entry in &request.chat_history {
            if !matches!(entry.role, MessageRole::User | MessageRole::Assistant) {
                return Err(OrchestratorError::Validation(
                    "chatHistory entries must have role 'user' or 'assistant'".to_string(),
                ));
            }
            if entry.content.trim().is_empty() {
                return Err(OrchestratorError::Validation(
                    "chatHistory entries must have non-empty content".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Keeps only the most recent [`STORAGE_MESSAGE_LIMIT`] entries, preserving
/// order. The caller's own copy of `chat_history` is left untouched — only
/// the provider-bound message list is truncated.
fn truncate_history(chat_history: &[Message]) -> &[Message] {
    if chat_history.len() > STORAGE_MESSAGE_LIMIT {
        &chat_history[chat_history.len() - STORAGE_MESSAGE_LIMIT..]
    } else {
        chat_history
    }
}
