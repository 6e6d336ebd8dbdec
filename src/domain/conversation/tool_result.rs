//! One-to-one pairing of a tool call with its output.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::tool_output::ToolOutput;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub tool_call_id: String,
    pub result: ToolOutput,
}

impl ToolResult {
    pub fn new(tool_call_id: impl Into<String>, result: ToolOutput) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            result,
        }
    }
}
