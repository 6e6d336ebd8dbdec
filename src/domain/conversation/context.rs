//! Per-request, read-only bundle passed to every tool invocation.

use crate::domain::conversation::widget::WidgetSummary;

/// Lifetime is one HTTP request. Shared by reference to every tool
/// invocation in that request; never mutated by a tool.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub database_path: Option<String>,
    pub widgets: Vec<WidgetSummary>,
}

impl Context {
    pub fn new(database_path: Option<String>, widgets: Vec<WidgetSummary>) -> Self {
        Self {
            database_path,
            widgets,
        }
    }
}
