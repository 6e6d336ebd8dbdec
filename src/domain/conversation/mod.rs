//! Conversation data model: messages, tool calls/results, widgets, context, usage.

mod context;
mod message;
mod tool_call;
mod tool_definition;
mod tool_output;
mod tool_result;
mod usage;
mod widget;

pub use context::Context;
pub use message::{Message, MessageRole};
pub use tool_call::ToolCall;
pub use tool_definition::ToolDefinition;
pub use tool_output::{ToolFailure, ToolOutput, ToolSuccess};
pub use tool_result::ToolResult;
pub use usage::Usage;
pub use widget::{WidgetDimensions, WidgetSummary, WidgetType};
