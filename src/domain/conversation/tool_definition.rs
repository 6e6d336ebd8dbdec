//! The process-wide, registry-facing description of a tool.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name, description, and JSON-schema-shaped parameter contract for a tool.
///
/// `name` is unique across the registry and is the exact string used at
/// dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameter_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameter_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_schema,
        }
    }

    /// Renders this definition in Anthropic's tool-use wire shape:
    /// `{name, description, input_schema}`.
    pub fn to_anthropic_format(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.parameter_schema,
        })
    }
}
