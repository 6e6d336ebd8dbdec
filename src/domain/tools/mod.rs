//! Tool Registry & Base Contract (C4) and the five built-in tool
//! implementations (C5): `get_schema_info`, `list_widgets`,
//! `execute_sql_query`, `create_widget`, `edit_widget`.
//!
//! Every tool exposes the same capability set so the orchestrator (C8) can
//! dispatch to any of them uniformly: a [`ToolDefinition`] for the provider's
//! tool catalog, parameter validation, and an `execute` that never lets an
//! error cross its boundary — every failure becomes a [`ToolOutput::Failure`].

mod create_widget;
mod edit_widget;
mod execute_sql_query;
mod get_schema_info;
mod list_widgets;
mod registry;
mod widget_id;

pub use create_widget::CreateWidgetTool;
pub use edit_widget::EditWidgetTool;
pub use execute_sql_query::ExecuteSqlQueryTool;
pub use get_schema_info::GetSchemaInfoTool;
pub use list_widgets::ListWidgetsTool;
pub use registry::ToolRegistry;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::conversation::{Context, ToolDefinition, ToolOutput};

/// The shared contract every tool implements.
///
/// `name`/`description`/`parameter_schema` feed the provider's tool catalog
/// (via [`Tool::definition`]); `prompt_description`/`usage_guidance`/
/// `example_queries` feed the system-prompt builder (C6).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable name, unique across the registry and used at dispatch.
    fn name(&self) -> &str;

    /// Description surfaced to the model in the tool catalog.
    fn description(&self) -> &str;

    /// JSON-schema-shaped parameter contract.
    fn parameter_schema(&self) -> Value;

    /// Short, one-line description for the system prompt's tool list.
    /// Defaults to [`Tool::description`].
    fn prompt_description(&self) -> &str {
        self.description()
    }

    /// Longer guidance on when/how to use this tool, for the system prompt.
    fn usage_guidance(&self) -> &str;

    /// Illustrative `"user query -> this tool"` examples for the prompt's
    /// combined example block.
    fn example_queries(&self) -> &[&str] {
        &[]
    }

    /// Tool-specific supplementary examples (e.g. chart-function snippets)
    /// appended after the combined example block. `None` when a tool has
    /// nothing extra to add.
    fn supplementary_examples(&self) -> Option<&str> {
        None
    }

    /// Bundles `name`/`description`/`parameter_schema` for the registry.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameter_schema())
    }

    /// Checks `args` against this tool's parameter contract before dispatch.
    fn validate_parameters(&self, args: &Value) -> Result<(), String>;

    /// Executes the tool. Never panics or propagates an error past this
    /// boundary — every internal failure is translated into
    /// `ToolOutput::Failure`.
    async fn execute(&self, args: Value, context: &Context) -> ToolOutput;
}

pub(crate) fn require_object<'a>(args: &'a Value, tool_name: &str) -> Result<&'a serde_json::Map<String, Value>, String> {
    args.as_object()
        .ok_or_else(|| format!("{tool_name} expects an object of named arguments"))
}

pub(crate) fn required_string(obj: &serde_json::Map<String, Value>, field: &str) -> Result<String, String> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("'{field}' is required and must be a non-empty string"))
}
