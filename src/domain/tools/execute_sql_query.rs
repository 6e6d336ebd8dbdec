//! `execute_sql_query` (C5, spec §4.5.3): runs a model-authored read-only
//! query and returns an AI-friendly summary, sample, and text table.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::conversation::{Context, ToolOutput};
use crate::domain::sql::{validate_query, SqlMode};
use crate::ports::{clamp_page_size, QueryExecutionError, QueryExecutor, QueryResult};

use super::{require_object, required_string, Tool};

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 200;
const SAMPLE_ROW_CAP: usize = 10;

pub struct ExecuteSqlQueryTool {
    query_executor: Arc<dyn QueryExecutor>,
}

impl ExecuteSqlQueryTool {
    pub fn new(query_executor: Arc<dyn QueryExecutor>) -> Self {
        Self { query_executor }
    }
}

/// Renders a capped row sample as a simple fixed-width text table for the
/// model to read without parsing JSON.
fn render_text_table(columns: &[String], rows: &[Vec<Value>]) -> String {
    if columns.is_empty() {
        return "(no columns)".to_string();
    }

    let cell_text = |v: &Value| -> String {
        match v {
            Value::Null => "NULL".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    };

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell_text(cell).len());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
        .collect();
    out.push_str(&header.join(" | "));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    for row in rows {
        out.push('\n');
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:<width$}", cell_text(v), width = widths.get(i).copied().unwrap_or(0)))
            .collect();
        out.push_str(&cells.join(" | "));
    }
    out
}

fn ai_friendly_payload(result: &QueryResult) -> Value {
    let sample: Vec<&Vec<Value>> = result.rows.iter().take(SAMPLE_ROW_CAP).collect();
    let sample_rows: Vec<Value> = sample.iter().map(|r| Value::Array((*r).clone())).collect();
    let text_table = render_text_table(
        &result.columns,
        &result.rows.iter().take(SAMPLE_ROW_CAP).cloned().collect::<Vec<_>>(),
    );

    json!({
        "summary": {
            "totalRows": result.total_rows,
            "returnedRows": result.rows.len(),
            "columns": result.columns,
            "hasMoreData": result.has_more,
        },
        "sample": sample_rows,
        "textTable": text_table,
    })
}

#[async_trait]
impl Tool for ExecuteSqlQueryTool {
    fn name(&self) -> &str {
        "execute_sql_query"
    }

    fn description(&self) -> &str {
        "Run a read-only SELECT query against the user's database and return the results."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "A single read-only SELECT statement. LIMIT/OFFSET are allowed."
                },
                "explanation": {
                    "type": "string",
                    "description": "One sentence explaining what this query is for, shown to the user."
                },
                "pageSize": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 200,
                    "description": "Rows per page, default 50."
                }
            },
            "required": ["query", "explanation"]
        })
    }

    fn usage_guidance(&self) -> &str {
        "Use this to answer questions that require reading actual data. Always include a short \
         explanation of what the query does. Paginate explicitly with LIMIT/OFFSET or pageSize \
         for large tables rather than requesting everything at once."
    }

    fn example_queries(&self) -> &[&str] {
        &[
            "How many rows are in the orders table?",
            "What's the average order value by month?",
        ]
    }

    fn validate_parameters(&self, args: &Value) -> Result<(), String> {
        let obj = require_object(args, self.name())?;
        required_string(obj, "query")?;
        required_string(obj, "explanation")?;
        if let Some(page_size) = obj.get("pageSize") {
            let n = page_size
                .as_u64()
                .ok_or_else(|| "'pageSize' must be an integer".to_string())?;
            if !(1..=MAX_PAGE_SIZE as u64).contains(&n) {
                return Err(format!("'pageSize' must be between 1 and {MAX_PAGE_SIZE}"));
            }
        }
        Ok(())
    }

    async fn execute(&self, args: Value, context: &Context) -> ToolOutput {
        let Some(database_path) = context.database_path.as_deref() else {
            return ToolOutput::failure("sql_error", "No database is loaded for this conversation.");
        };

        let query = match args.get("query").and_then(Value::as_str) {
            Some(q) => q,
            None => return ToolOutput::failure("sql_error", "'query' is required."),
        };

        if let Err(validation_err) = validate_query(query, SqlMode::Tool) {
            return ToolOutput::failure("sql_error", validation_err.0);
        }

        let page_size = clamp_page_size(
            args.get("pageSize").and_then(Value::as_u64).map(|n| n as u32),
            DEFAULT_PAGE_SIZE,
            MAX_PAGE_SIZE,
        );

        match self.query_executor.execute(database_path, query, 1, page_size).await {
            Ok(result) => ToolOutput::success("query_executed", ai_friendly_payload(&result)),
            Err(err) => map_execution_error(err),
        }
    }
}

fn map_execution_error(err: QueryExecutionError) -> ToolOutput {
    match err {
        QueryExecutionError::TableNotFound(table) => ToolOutput::failure(
            "table_not_found",
            format!("Table '{table}' does not exist."),
        ),
        QueryExecutionError::ColumnNotFound(column) => ToolOutput::failure(
            "column_not_found",
            format!("Column '{column}' does not exist."),
        ),
        QueryExecutionError::SyntaxError(detail) => {
            ToolOutput::failure("syntax_error", "The query has a SQL syntax error.").with_original_error(detail)
        }
        QueryExecutionError::DatabaseNotFound(path) => {
            ToolOutput::failure("sql_error", format!("Database file not found: {path}"))
        }
        other => ToolOutput::failure("sql_error", "The query could not be executed.").with_original_error(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubExecutor {
        response: Mutex<Option<Result<QueryResult, QueryExecutionError>>>,
    }

    #[async_trait]
    impl QueryExecutor for StubExecutor {
        async fn execute(
            &self,
            _database_path: &str,
            _query: &str,
            _page: u32,
            _page_size: u32,
        ) -> Result<QueryResult, QueryExecutionError> {
            self.response.lock().unwrap().take().expect("single-use stub")
        }
    }

    fn context_with_db() -> Context {
        Context::new(Some("./uploads/d.db".to_string()), vec![])
    }

    fn sample_result() -> QueryResult {
        QueryResult {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                vec![json!(1), json!("Alice")],
                vec![json!(2), Value::Null],
            ],
            total_rows: 2,
            page: 1,
            page_size: 50,
            total_pages: 1,
            has_more: false,
        }
    }

    #[tokio::test]
    async fn rejects_forbidden_sql_before_executing() {
        let tool = ExecuteSqlQueryTool::new(Arc::new(StubExecutor { response: Mutex::new(None) }));
        let out = tool
            .execute(
                json!({"query": "DROP TABLE users", "explanation": "x"}),
                &context_with_db(),
            )
            .await;
        assert!(!out.is_success());
        assert_eq!(out.action(), "sql_error");
    }

    #[tokio::test]
    async fn successful_query_produces_ai_friendly_payload() {
        let tool = ExecuteSqlQueryTool::new(Arc::new(StubExecutor {
            response: Mutex::new(Some(Ok(sample_result()))),
        }));
        let out = tool
            .execute(
                json!({"query": "SELECT * FROM users", "explanation": "list users"}),
                &context_with_db(),
            )
            .await;
        assert!(out.is_success());
        if let ToolOutput::Success(s) = out {
            assert_eq!(s.data["summary"]["totalRows"], 2);
            assert_eq!(s.data["summary"]["returnedRows"], 2);
            assert!(s.data["textTable"].as_str().unwrap().contains("Alice"));
            assert!(s.data["textTable"].as_str().unwrap().contains("NULL"));
        }
    }

    #[tokio::test]
    async fn table_not_found_maps_to_distinct_action() {
        let tool = ExecuteSqlQueryTool::new(Arc::new(StubExecutor {
            response: Mutex::new(Some(Err(QueryExecutionError::TableNotFound("ghosts".to_string())))),
        }));
        let out = tool
            .execute(
                json!({"query": "SELECT * FROM ghosts", "explanation": "x"}),
                &context_with_db(),
            )
            .await;
        assert_eq!(out.action(), "table_not_found");
    }

    #[test]
    fn validate_parameters_requires_query_and_explanation() {
        let tool = ExecuteSqlQueryTool::new(Arc::new(StubExecutor { response: Mutex::new(None) }));
        assert!(tool.validate_parameters(&json!({"query": "SELECT 1"})).is_err());
        assert!(tool
            .validate_parameters(&json!({"query": "SELECT 1", "explanation": "x"}))
            .is_ok());
    }

    #[test]
    fn validate_parameters_rejects_out_of_range_page_size() {
        let tool = ExecuteSqlQueryTool::new(Arc::new(StubExecutor { response: Mutex::new(None) }));
        assert!(tool
            .validate_parameters(&json!({"query": "SELECT 1", "explanation": "x", "pageSize": 0}))
            .is_err());
        assert!(tool
            .validate_parameters(&json!({"query": "SELECT 1", "explanation": "x", "pageSize": 500}))
            .is_err());
    }
}
