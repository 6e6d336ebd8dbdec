//! Widget metadata the core treats as opaque reference data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    DataTable,
    Graph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDimensions {
    pub width: u8,
    pub height: u8,
}

impl WidgetDimensions {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;
    pub const DEFAULT: u8 = 2;

    pub fn default_square() -> Self {
        Self {
            width: Self::DEFAULT,
            height: Self::DEFAULT,
        }
    }

    pub fn in_range(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.width) && (Self::MIN..=Self::MAX).contains(&self.height)
    }
}

/// A dashboard widget as the orchestrator's caller sees it: a title, a
/// read-only query, dimensions, and whether it already has data. The core
/// never mutates this; `create_widget`/`edit_widget` return new values for
/// the caller to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSummary {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub query: String,
    pub dimensions: WidgetDimensions,
    pub has_results: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_function: Option<String>,
}
