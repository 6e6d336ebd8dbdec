//! Tool-call requests emitted by the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool invocation requested by the model within one assistant turn.
///
/// `id` is stable and unique within that turn; `arguments` is the raw JSON
/// string the provider returned, treated as `"{}"` when blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parses `arguments` as JSON, treating a whitespace-only string as `{}`.
    pub fn parsed_arguments(&self) -> Result<Value, serde_json::Error> {
        let trimmed = self.arguments.trim();
        if trimmed.is_empty() {
            Ok(Value::Object(Default::default()))
        } else {
            serde_json::from_str(trimmed)
        }
    }
}
