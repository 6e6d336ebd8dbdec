//! `list_widgets` (C5, spec §4.5.2): reports the dashboard's current widgets
//! with a derived status per widget and a human-readable summary.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::conversation::{Context, ToolOutput, WidgetSummary, WidgetType};

use super::Tool;

pub struct ListWidgetsTool;

impl ListWidgetsTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ListWidgetsTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the widget's display status.
///
/// The data model carries only a boolean `hasResults`, so "no results (query
/// returned empty)" — distinct from "configured but not run" — isn't
/// reachable from this flag alone; see DESIGN.md for that decision.
fn widget_status(widget: &WidgetSummary) -> &'static str {
    if widget.query.trim().is_empty() {
        "empty (no query set)"
    } else if widget.has_results {
        "showing data"
    } else {
        "configured but not run"
    }
}

fn summarize(widgets: &[WidgetSummary]) -> String {
    if widgets.is_empty() {
        return "No widgets on this dashboard yet.".to_string();
    }

    let tables = widgets.iter().filter(|w| w.widget_type == WidgetType::DataTable).count();
    let graphs = widgets.iter().filter(|w| w.widget_type == WidgetType::Graph).count();
    let showing_data = widgets.iter().filter(|w| w.has_results).count();
    let not_run = widgets.len() - showing_data;

    format!(
        "{} widget{} ({} table{}, {} graph{}): {} showing data, {} not yet showing results.",
        widgets.len(),
        if widgets.len() == 1 { "" } else { "s" },
        tables,
        if tables == 1 { "" } else { "s" },
        graphs,
        if graphs == 1 { "" } else { "s" },
        showing_data,
        not_run,
    )
}

#[async_trait]
impl Tool for ListWidgetsTool {
    fn name(&self) -> &str {
        "list_widgets"
    }

    fn description(&self) -> &str {
        "List the dashboard's current widgets, with each widget's title, type, query, and status."
    }

    fn parameter_schema(&self) -> Value {
        json!({ "type": "object", "properties": {}, "required": [] })
    }

    fn usage_guidance(&self) -> &str {
        "Call this to see what's already on the user's dashboard before creating a new widget \
         that might duplicate one, or when the user asks what widgets they have."
    }

    fn example_queries(&self) -> &[&str] {
        &["What widgets do I have?", "What's on my dashboard already?"]
    }

    fn validate_parameters(&self, _args: &Value) -> Result<(), String> {
        Ok(())
    }

    async fn execute(&self, _args: Value, context: &Context) -> ToolOutput {
        let records: Vec<Value> = context
            .widgets
            .iter()
            .map(|w| {
                json!({
                    "id": w.id,
                    "title": w.title,
                    "type": w.widget_type,
                    "query": w.query,
                    "dimensions": w.dimensions,
                    "hasResults": w.has_results,
                    "status": widget_status(w),
                })
            })
            .collect();

        ToolOutput::success(
            "widgets_listed",
            json!({
                "widgets": records,
                "count": context.widgets.len(),
                "summary": summarize(&context.widgets),
            }),
        )
    }
}
