//! System-Prompt Builder (C6): deterministic assembly of the system prompt
//! fed to the LLM adapter from the registered tool list.
//!
//! The output is a pure function of the tool registry's contents (in
//! registration order) and the supplied date — no clock reads, no I/O —
//! so the same registry and date always yield byte-identical prompts.

use chrono::NaiveDate;

use crate::domain::tools::ToolRegistry;

/// Builds the system prompt for a chat request.
///
/// `today` is passed in rather than read from the clock so the builder stays
/// a pure function; callers pass `chrono::Utc::now().date_naive()` at the
/// HTTP boundary.
pub fn build_system_prompt(registry: &ToolRegistry, today: NaiveDate) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a data analysis assistant embedded in an interactive database \
         exploration tool. You help users understand their data by inspecting \
         schemas, running read-only SQL queries, and building dashboard widgets \
         (tables and charts) on their behalf.\n\n",
    );
    prompt.push_str(&format!("Today's date is {}.\n\n", today.format("%Y-%m-%d")));

    prompt.push_str(&format!(
        "You have access to {} tool{}:\n",
        registry.len(),
        if registry.len() == 1 { "" } else { "s" }
    ));
    for tool in registry.iter() {
        prompt.push_str(&format!("- {}: {}\n", tool.name(), tool.prompt_description()));
    }
    prompt.push('\n');

    prompt.push_str("General guidance:\n");
    for tool in registry.iter() {
        prompt.push_str(&format!("- {}: {}\n", tool.name(), tool.usage_guidance()));
    }
    prompt.push('\n');

    let examples: Vec<(String, &str)> = registry
        .iter()
        .flat_map(|tool| tool.example_queries().iter().map(move |q| (q.to_string(), tool.name())))
        .collect();
    if !examples.is_empty() {
        prompt.push_str("Examples of user requests and the tool they map to:\n");
        for (query, tool_name) in &examples {
            prompt.push_str(&format!("- \"{query}\" -> {tool_name}\n"));
        }
        prompt.push('\n');
    }

    for tool in registry.iter() {
        if let Some(extra) = tool.supplementary_examples() {
            prompt.push_str(extra);
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "Always call get_schema_info before writing SQL against a table you \
         haven't already inspected in this conversation. Only ever issue SELECT \
         queries; never attempt to modify data.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ports::{QueryExecutor, SchemaReader};
    use async_trait::async_trait;

    use crate::domain::tools::Tool;
    use crate::ports::{DatabaseSchema, QueryExecutionError, QueryResult, SchemaError, SchemaOutcome};

    struct StubSchemaReader;

    #[async_trait]
    impl SchemaReader for StubSchemaReader {
        async fn read_schema(&self, _db: &str, _table: Option<&str>) -> Result<SchemaOutcome, SchemaError> {
            Ok(SchemaOutcome::Full(DatabaseSchema { tables: vec![] }))
        }
    }

    struct StubQueryExecutor;

    #[async_trait]
    impl QueryExecutor for StubQueryExecutor {
        async fn execute(
            &self,
            _database_path: &str,
            _query: &str,
            _page: u32,
            _page_size: u32,
        ) -> Result<QueryResult, QueryExecutionError> {
            Ok(QueryResult {
                columns: vec![],
                rows: vec![],
                total_rows: 0,
                page: 1,
                page_size: 1,
                total_pages: 1,
                has_more: false,
            })
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::standard(Arc::new(StubQueryExecutor), Arc::new(StubSchemaReader))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 28).unwrap()
    }

    #[test]
    fn prompt_is_deterministic_for_fixed_registry_and_date() {
        let registry = registry();
        let first = build_system_prompt(&registry, date());
        let second = build_system_prompt(&registry, date());
        assert_eq!(first, second);
    }

    #[test]
    fn prompt_lists_every_tool_by_name() {
        let registry = registry();
        let prompt = build_system_prompt(&registry, date());
        for tool in registry.iter() {
            assert!(prompt.contains(tool.name()), "missing {} in prompt", tool.name());
        }
    }

    #[test]
    fn prompt_includes_the_date() {
        let prompt = build_system_prompt(&registry(), date());
        assert!(prompt.contains("2026-07-28"));
    }

    #[test]
    fn prompt_includes_tool_count() {
        let registry = registry();
        let prompt = build_system_prompt(&registry, date());
        assert!(prompt.contains(&format!("{} tools", registry.len())));
    }
}
