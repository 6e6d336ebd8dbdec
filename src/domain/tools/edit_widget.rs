//! `edit_widget` (C5, spec §4.5.5): partially overlays a widget and
//! re-previews it only when the query or its type actually changed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::conversation::{Context, ToolOutput, WidgetDimensions, WidgetSummary, WidgetType};
use crate::domain::sql::{validate_query, SqlMode};
use crate::ports::{QueryExecutionError, QueryExecutor};

use super::Tool;

pub struct EditWidgetTool {
    query_executor: Arc<dyn QueryExecutor>,
}

impl EditWidgetTool {
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

fn looks_like_chart_function(source: &str) -> bool {
    source.contains("function") && source.contains("createChart")
}

#[async_trait]
impl Tool for EditWidgetTool {
    fn name(&self) -> &str {
        "edit_widget"
    }

    fn description(&self) -> &str {
        "Edit an existing dashboard widget's title, query, type, dimensions, or chart function."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "widgetId": { "type": "integer", "minimum": 1 },
                "title": { "type": "string" },
                "widgetType": { "type": "string", "enum": ["data-table", "graph"] },
                "query": { "type": "string" },
                "width": { "type": "integer", "minimum": 1, "maximum": 4 },
                "height": { "type": "integer", "minimum": 1, "maximum": 4 },
                "chartFunction": { "type": "string" }
            },
            "required": ["widgetId"]
        })
    }

    fn usage_guidance(&self) -> &str {
        "Use this to tweak a widget the user already has instead of creating a duplicate. Only \
         pass the fields that should change; anything omitted keeps its current value."
    }

    fn example_queries(&self) -> &[&str] {
        &["Make that chart wider", "Change the orders widget to filter to last 30 days"]
    }

    fn validate_parameters(&self, args: &Value) -> Result<(), String> {
        let obj = args
            .as_object()
            .ok_or_else(|| "edit_widget expects an object of named arguments".to_string())?;
        let widget_id = obj
            .get("widgetId")
            .and_then(Value::as_i64)
            .ok_or_else(|| "'widgetId' is required and must be a positive integer".to_string())?;
        if widget_id <= 0 {
            return Err("'widgetId' must be a positive integer".to_string());
        }
        if let Some(t) = obj.get("widgetType") {
            let t = t.as_str().ok_or_else(|| "'widgetType' must be a string".to_string())?;
            parse_widget_type(t)?;
        }
        for field in ["width", "height"] {
            if let Some(v) = obj.get(field) {
                let n = v.as_u64().ok_or_else(|| format!("'{field}' must be an integer"))?;
                if !((WidgetDimensions::MIN as u64)..=(WidgetDimensions::MAX as u64)).contains(&n) {
                    return Err(format!(
                        "'{field}' must be between {} and {}",
                        WidgetDimensions::MIN,
                        WidgetDimensions::MAX
                    ));
                }
            }
        }
        Ok(())
    }

    async fn execute(&self, args: Value, context: &Context) -> ToolOutput {
        let obj = match args.as_object() {
            Some(obj) => obj,
            None => return ToolOutput::failure("widget_error", "Arguments must be an object."),
        };

        let widget_id = match obj.get("widgetId").and_then(Value::as_i64) {
            Some(id) if id > 0 => id,
            _ => return ToolOutput::failure("widget_error", "'widgetId' is required and must be a positive integer."),
        };

        let Some(existing) = context.widgets.iter().find(|w| w.id == widget_id) else {
            return ToolOutput::failure("widget_not_found", format!("No widget with id {widget_id}."));
        };

        let new_title = obj.get("title").and_then(Value::as_str).map(str::to_string);
        let new_query = obj.get("query").and_then(Value::as_str).map(str::to_string);
        let new_widget_type = match obj.get("widgetType").and_then(Value::as_str) {
            Some(raw) => match parse_widget_type(raw) {
                Ok(t) => Some(t),
                Err(e) => return ToolOutput::failure("widget_error", e),
            },
            None => None,
        };
        let new_chart_function = obj.get("chartFunction").and_then(Value::as_str).map(str::to_string);
        let new_width = obj.get("width").and_then(Value::as_u64).map(|n| n as u8);
        let new_height = obj.get("height").and_then(Value::as_u64).map(|n| n as u8);

        let merged_type = new_widget_type.unwrap_or(existing.widget_type);
        let merged_chart_function = new_chart_function.clone().or_else(|| existing.chart_function.clone());

        if merged_type == WidgetType::Graph {
            match &merged_chart_function {
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
                        "Converting to a graph widget requires 'chartFunction'.",
                    )
                }
            }
        }

        let merged_dimensions = WidgetDimensions {
            width: new_width.unwrap_or(existing.dimensions.width),
            height: new_height.unwrap_or(existing.dimensions.height),
        };
        if !merged_dimensions.in_range() {
            return ToolOutput::failure(
                "widget_error",
                format!(
                    "Widget dimensions must be between {} and {}.",
                    WidgetDimensions::MIN,
                    WidgetDimensions::MAX
                ),
            );
        }

        let merged_query = new_query.clone().unwrap_or_else(|| existing.query.clone());
        if new_query.is_some() {
            if let Err(validation_err) = validate_query(&merged_query, SqlMode::Widget) {
                return ToolOutput::failure("widget_error", validation_err.0);
            }
        }

        let query_changed = new_query.as_deref().is_some_and(|q| q != existing.query);
        let type_changed = new_widget_type.is_some_and(|t| t != existing.widget_type);

        let mut results = None;
        if query_changed || type_changed {
            let Some(database_path) = context.database_path.as_deref() else {
                return ToolOutput::failure("widget_error", "No database is loaded for this conversation.");
            };
            match self.query_executor.execute(database_path, &merged_query, 1, u32::MAX).await {
                Ok(result) => {
                    results = Some(json!({
                        "columns": result.columns,
                        "rows": result.rows,
                        "totalRows": result.total_rows,
                    }));
                }
                Err(err) => return map_execution_error(err),
            }
        }

        let changes = diff_changes(existing, &new_title, &new_query, new_widget_type, &merged_dimensions, &new_chart_function);

        let widget_config = json!({
            "id": existing.id,
            "title": new_title.clone().unwrap_or_else(|| existing.title.clone()),
            "type": merged_type,
            "query": merged_query,
            "dimensions": merged_dimensions,
            "chartFunction": merged_chart_function,
        });

        ToolOutput::success(
            "widget_updated",
            json!({
                "widgetConfig": widget_config,
                "changes": changes,
                "results": results,
            }),
        )
    }
}

fn diff_changes(
    existing: &WidgetSummary,
    new_title: &Option<String>,
    new_query: &Option<String>,
    new_widget_type: Option<WidgetType>,
    merged_dimensions: &WidgetDimensions,
    new_chart_function: &Option<String>,
) -> Vec<String> {
    let mut changes = Vec::new();
    if let Some(title) = new_title {
        if title != &existing.title {
            changes.push("title".to_string());
        }
    }
    if let Some(query) = new_query {
        if query != &existing.query {
            changes.push("query".to_string());
        }
    }
    if let Some(widget_type) = new_widget_type {
        if widget_type != existing.widget_type {
            changes.push("widgetType".to_string());
        }
    }
    if merged_dimensions.width != existing.dimensions.width || merged_dimensions.height != existing.dimensions.height {
        changes.push("dimensions".to_string());
    }
    if let Some(chart_function) = new_chart_function {
        if Some(chart_function) != existing.chart_function.as_ref() {
            changes.push("chartFunction".to_string());
        }
    }
    changes
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
        other => ToolOutput::failure("widget_error", "The updated query could not be executed.")
            .with_original_error(other.to_string()),
    }
}
