//! `create_widget` (C5, spec §4.5.4): validates and previews a new dashboard
//! widget, returning a `widgetConfig` the caller persists.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::conversation::{Context, ToolOutput, WidgetDimensions, WidgetType};
use crate::domain::sql::{validate_query, SqlMode};
use crate::ports::{QueryExecutionError, QueryExecutor};

use super::widget_id;
use super::{require_object, required_string, Tool};

pub struct CreateWidgetTool {
    query_executor: Arc<dyn QueryExecutor>,
}

impl CreateWidgetTool {
    pub fn new(query_executor: Arc<dyn QueryExecutor>) -> Self {
        Self { query_executor }
    }
}

fn parse_widget_type(raw: &str) -> Result<WidgetType, String> {
    match raw {
        "data-table" => Ok(WidgetType::DataTable),
        "graph" => Ok(WidgetType::Graph),
        other => Err(format!("'widgetType' must be 'data-table' or 'graph', got '{other}'")),
    }
}

fn parse_dimension(obj: &serde_json::Map<String, Value>, field: &str) -> Result<u8, String> {
    match obj.get(field) {
        None => Ok(WidgetDimensions::DEFAULT),
        Some(v) => v
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| format!("'{field}' must be an integer between {} and {}", WidgetDimensions::MIN, WidgetDimensions::MAX)),
    }
}

/// Lexical sanity check: the chart function source must look like a chart
/// function, not a full parse — it just has to mention both markers.
fn looks_like_chart_function(source: &str) -> bool {
    source.contains("function") && source.contains("createChart")
}

#[async_trait]
impl Tool for CreateWidgetTool {
    fn name(&self) -> &str {
        "create_widget"
    }

    fn description(&self) -> &str {
        "Create a new dashboard widget (a data table or a custom chart) backed by a read-only query."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "widgetType": { "type": "string", "enum": ["data-table", "graph"] },
                "query": { "type": "string", "description": "A read-only SELECT statement, no LIMIT/OFFSET." },
                "width": { "type": "integer", "minimum": 1, "maximum": 4 },
                "height": { "type": "integer", "minimum": 1, "maximum": 4 },
                "chartFunction": {
                    "type": "string",
                    "description": "Required for graph widgets: JS source defining a createChart function."
                }
            },
            "required": ["title", "widgetType", "query"]
        })
    }

    fn usage_guidance(&self) -> &str {
        "Use this once you have a working query the user wants pinned to their dashboard. Check \
         get_schema_info first so the query references real tables and columns. For graph \
         widgets, chartFunction is required."
    }

    fn example_queries(&self) -> &[&str] {
        &["Add a table widget showing the top 10 customers by revenue"]
    }

    fn validate_parameters(&self, args: &Value) -> Result<(), String> {
        let obj = require_object(args, self.name())?;
        required_string(obj, "title")?;
        let widget_type_raw = required_string(obj, "widgetType")?;
        parse_widget_type(&widget_type_raw)?;
        required_string(obj, "query")?;
        parse_dimension(obj, "width")?;
        parse_dimension(obj, "height")?;
        if widget_type_raw == "graph" {
            let chart_function = required_string(obj, "chartFunction")
                .map_err(|_| "'chartFunction' is required for graph widgets".to_string())?;
            if !looks_like_chart_function(&chart_function) {
                return Err(
                    "'chartFunction' must define a createChart function".to_string(),
                );
            }
        }
        Ok(())
    }

    async fn execute(&self, args: Value, context: &Context) -> ToolOutput {
        let Some(database_path) = context.database_path.as_deref() else {
            return ToolOutput::failure("widget_error", "No database is loaded for this conversation.");
        };

        let obj = match args.as_object() {
            Some(obj) => obj,
            None => return ToolOutput::failure("widget_error", "Arguments must be an object."),
        };

        let title = match obj.get("title").and_then(Value::as_str) {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => return ToolOutput::failure("widget_error", "'title' is required."),
        };

        let widget_type_raw = match obj.get("widgetType").and_then(Value::as_str) {
            Some(t) => t,
            None => return ToolOutput::failure("widget_error", "'widgetType' is required."),
        };
        let widget_type = match parse_widget_type(widget_type_raw) {
            Ok(t) => t,
            Err(e) => return ToolOutput::failure("widget_error", e),
        };

        let query = match obj.get("query").and_then(Value::as_str) {
            Some(q) => q,
            None => return ToolOutput::failure("widget_error", "'query' is required."),
        };

        let width = match parse_dimension(obj, "width") {
            Ok(w) => w,
            Err(e) => return ToolOutput::failure("widget_error", e),
        };
        let height = match parse_dimension(obj, "height") {
            Ok(h) => h,
            Err(e) => return ToolOutput::failure("widget_error", e),
        };
        let dimensions = WidgetDimensions { width, height };
        if !dimensions.in_range() {
            return ToolOutput::failure(
                "widget_error",
                format!(
                    "Widget dimensions must be between {} and {}.",
                    WidgetDimensions::MIN,
                    WidgetDimensions::MAX
                ),
            );
        }

        let chart_function = obj.get("chartFunction").and_then(Value::as_str).map(str::to_string);
        if widget_type == WidgetType::Graph {
            match &chart_function {
                Some(source) if looks_like_chart_function(source) => {}
                Some(_) => {
                    return ToolOutput::failure(
                        "widget_error",
                        "'chartFunction' must define a createChart function.",
                    )
                }
                None => {
                    return ToolOutput::failure(
                        "widget_error",
                        "'chartFunction' is required for graph widgets.",
                    )
                }
            }
        }

        if let Err(validation_err) = validate_query(query, SqlMode::Widget) {
            return ToolOutput::failure("widget_error", validation_err.0);
        }

        let preview = match self.query_executor.execute(database_path, query, 1, u32::MAX).await {
            Ok(result) => result,
            Err(err) => return map_execution_error(err),
        };

        let id = widget_id::generate();
        let widget_config = json!({
            "id": id,
            "title": title,
            "type": widget_type,
            "query": query,
            "dimensions": dimensions,
            "chartFunction": chart_function,
        });

        ToolOutput::success(
            "widget_created",
            json!({
                "widgetConfig": widget_config,
                "results": {
                    "columns": preview.columns,
                    "rows": preview.rows,
                    "totalRows": preview.total_rows,
                },
            }),
        )
    }
}

fn map_execution_error(err: QueryExecutionError) -> ToolOutput {
    match err {
        QueryExecutionError::TableNotFound(table) => {
            ToolOutput::failure("table_not_found", format!("Table '{table}' does not exist."))
        }
        QueryExecutionError::ColumnNotFound(column) => {
            ToolOutput::failure("column_not_found", format!("Column '{column}' does not exist."))
        }
        QueryExecutionError::SyntaxError(detail) => {
            ToolOutput::failure("syntax_error", "The query has a SQL syntax error.").with_original_error(detail)
        }
        QueryExecutionError::DatabaseNotFound(path) => {
            ToolOutput::failure("widget_error", format!("Database file not found: {path}"))
        }
        other => ToolOutput::failure("widget_error", "The preview query could not be executed.")
            .with_original_error(other.to_string()),
    }
}
