//! Data transfer objects for `POST /query`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryHttpRequest {
    pub filename: String,
    pub query: String,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryHttpResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub total_rows: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_more: bool,
}

impl From<crate::ports::QueryResult> for QueryHttpResponse {
    fn from(result: crate::ports::QueryResult) -> Self {
        Self {
            columns: result.columns,
            rows: result.rows,
            total_rows: result.total_rows,
            page: result.page,
            page_size: result.page_size,
            total_pages: result.total_pages,
            has_more: result.has_more,
        }
    }
}
