//! Data transfer objects for `POST /chat`.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Message, ToolResult, Usage, WidgetSummary};

/// Request body for `POST /chat`, per spec.md §6.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHttpRequest {
    pub message: String,
    #[serde(default)]
    pub chat_history: Vec<Message>,
    pub database_path: Option<String>,
    #[serde(default)]
    pub widgets: Vec<WidgetSummary>,
}

/// Successful response body for `POST /chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHttpResponse {
    pub success: bool,
    pub message: String,
    pub usage: Usage,
    pub tool_results: Vec<ToolResult>,
    pub iterations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reached_max_iterations: Option<bool>,
}

/// The flat `{"error": "..."}` shape every error response uses (spec.md §6).
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_with_defaults() {
        let json = r#"{"message": "hi"}"#;
        let request: ChatHttpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.message, "hi");
        assert!(request.chat_history.is_empty());
        assert!(request.database_path.is_none());
        assert!(request.widgets.is_empty());
    }

    #[test]
    fn error_body_serializes_flat() {
        let body = ErrorBody::new("bad request");
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"error":"bad request"}"#);
    }
}
