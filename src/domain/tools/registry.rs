//! Ordered, immutable tool catalog (C4).

use std::sync::Arc;

use crate::domain::conversation::ToolDefinition;
use crate::ports::{QueryExecutor, SchemaReader};

use super::{CreateWidgetTool, EditWidgetTool, ExecuteSqlQueryTool, GetSchemaInfoTool, ListWidgetsTool, Tool};

/// Process-wide registry of the five built-in tools, in a fixed order.
///
/// Built once at startup and never mutated afterward — safe to share across
/// requests without locking. Ordering matters: it determines the order tools
/// are listed in the system prompt, so it must stay reproducible.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Builds the registry from an explicit, already-ordered tool list.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Builds the standard registry: the five built-in tools wired to the
    /// given query executor and schema reader, in the fixed order
    /// `get_schema_info, list_widgets, execute_sql_query, create_widget,
    /// edit_widget`.
    pub fn standard(query_executor: Arc<dyn QueryExecutor>, schema_reader: Arc<dyn SchemaReader>) -> Self {
        Self::new(vec![
            Arc::new(GetSchemaInfoTool::new(schema_reader)),
            Arc::new(ListWidgetsTool::new()),
            Arc::new(ExecuteSqlQueryTool::new(query_executor.clone())),
            Arc::new(CreateWidgetTool::new(query_executor.clone())),
            Arc::new(EditWidgetTool::new(query_executor)),
        ])
    }

    /// Looks up a tool by its registered name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// The catalog of tool definitions, in registration order, as handed to
    /// the LLM adapter.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::domain::conversation::{Context, ToolOutput};

    struct StubTool(&'static str);

    #[async_trait]
    impl Tool for StubTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "stub"
        }
        fn parameter_schema(&self) -> Value {
            json!({"type": "object"})
        }
        fn usage_guidance(&self) -> &str {
            "stub guidance"
        }
        fn validate_parameters(&self, _args: &Value) -> Result<(), String> {
            Ok(())
        }
        async fn execute(&self, _args: Value, _context: &Context) -> ToolOutput {
            ToolOutput::success("stub", json!({}))
        }
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = ToolRegistry::new(vec![
            Arc::new(StubTool("a")),
            Arc::new(StubTool("b")),
            Arc::new(StubTool("c")),
        ]);

        let names: Vec<&str> = registry.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn get_finds_registered_tool_by_name() {
        let registry = ToolRegistry::new(vec![Arc::new(StubTool("a"))]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("missing").is_none());
        assert!(registry.has_tool("a"));
        assert!(!registry.has_tool("missing"));
    }

    #[test]
    fn definitions_match_registered_tool_count_and_order() {
        let registry = ToolRegistry::new(vec![Arc::new(StubTool("a")), Arc::new(StubTool("b"))]);
        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "a");
        assert_eq!(defs[1].name, "b");
    }
}
