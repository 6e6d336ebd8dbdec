//! HTTP handler for `POST /chat`.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::domain::orchestrator::{ChatRequest, OrchestratorError};

use super::super::AppState;
use super::dto::{ChatHttpRequest, ChatHttpResponse, ErrorBody};

/// `POST /chat` — runs one full orchestrator turn (C8) and returns its
/// final answer plus everything the widget/debugging UI needs.
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatHttpRequest>) -> impl IntoResponse {
    let mut chat_request = ChatRequest::new(request.message)
        .with_history(request.chat_history)
        .with_widgets(request.widgets);
    if let Some(database_path) = request.database_path {
        chat_request = chat_request.with_database_path(database_path);
    }

    match state.orchestrator.process_chat(chat_request).await {
        Ok(response) => (
            StatusCode::OK,
            Json(ChatHttpResponse {
                success: true,
                message: response.message,
                usage: response.usage,
                tool_results: response.tool_results,
                iterations: response.iterations,
                reached_max_iterations: response.reached_max_iterations.then_some(true),
            }),
        )
            .into_response(),
        Err(OrchestratorError::Validation(message)) => (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response(),
        Err(OrchestratorError::Timeout) => (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorBody::new("Request timed out - workflow took too long to complete")),
        )
            .into_response(),
        Err(OrchestratorError::AdapterUnavailable(err)) => {
            tracing::error!(error = %err, "AI provider unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorBody::new("AI service temporarily unavailable"))).into_response()
        }
    }
}
