//! Query Executor port (C2) — paginated, read-only SQL execution against a
//! user-supplied SQLite file.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A single page of query results.
///
/// `rows.len() <= page_size`; every row has `columns.len()` cells in the
/// same order as `columns`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub total_rows: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_more: bool,
}

#[derive(Debug, Error)]
pub enum QueryExecutionError {
    #[error("database file not found: {0}")]
    DatabaseNotFound(String),
    #[error("no such table: {0}")]
    TableNotFound(String),
    #[error("no such column: {0}")]
    ColumnNotFound(String),
    #[error("SQL syntax error: {0}")]
    SyntaxError(String),
    #[error("SQL error: {0}")]
    Sql(String),
    #[error("I/O error: {0}")]
    Io(String),
}

/// Clamps a requested page size into `[1, max]`, defaulting to `default` when absent.
pub fn clamp_page_size(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max)
}

/// Port for executing a validated, read-only SELECT with server-imposed pagination.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        database_path: &str,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<QueryResult, QueryExecutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_page_size_uses_default_when_absent() {
        assert_eq!(clamp_page_size(None, 50, 200), 50);
    }

    #[test]
    fn clamp_page_size_clamps_high_values() {
        assert_eq!(clamp_page_size(Some(5000), 50, 200), 200);
    }

    #[test]
    fn clamp_page_size_clamps_zero_to_one() {
        assert_eq!(clamp_page_size(Some(0), 50, 200), 1);
    }
}
