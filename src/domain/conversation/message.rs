//! Conversation messages exchanged with the LLM provider.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::tool_call::ToolCall;
use crate::domain::foundation::ValidationError;

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A single turn in the conversation.
///
/// `tool_calls` is only ever `Some` on an assistant message; `tool_call_id`
/// is only ever `Some` on a tool message. `content` may be empty only when
/// `tool_calls` is non-empty (the assistant emitted tool calls and no prose).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// A plain assistant reply with no tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// An assistant turn that also requested tool calls.
    ///
    /// `content` may be empty here since the model may emit only tool calls.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Result<Self, ValidationError> {
        if tool_calls.is_empty() {
            return Err(ValidationError::invalid_format(
                "tool_calls",
                "must be non-empty when constructing an assistant message with tool calls",
            ));
        }
        Ok(Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        })
    }

    /// A tool-role message carrying the result of one tool call.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            role: MessageRole::Tool,
            content,
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_with_tool_calls_rejects_empty_list() {
        let err = Message::assistant_with_tool_calls("", vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn tool_result_rejects_empty_content() {
        let err = Message::tool_result("call_1", "");
        assert!(err.is_err());
    }

    #[test]
    fn message_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::Tool).unwrap(), "\"tool\"");
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
    }
}
