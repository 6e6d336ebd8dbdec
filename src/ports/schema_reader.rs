//! Schema Reader port (C3) — table/column/row-count introspection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub nullable: bool,
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub row_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSchema {
    pub tables: Vec<TableSchema>,
}

/// Result of a schema read, distinguishing "no such table" from the rest so
/// callers can surface the list of available tables.
#[derive(Debug, Clone)]
pub enum SchemaOutcome {
    Full(DatabaseSchema),
    Table(TableSchema),
    TableNotFound {
        requested: String,
        available: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("database file not found: {0}")]
    DatabaseNotFound(String),
    #[error("SQL error: {0}")]
    Sql(String),
    #[error("I/O error: {0}")]
    Io(String),
}

#[async_trait]
pub trait SchemaReader: Send + Sync {
    /// Reads the full schema when `table_name` is `None`, or one table's
    /// schema (or a not-found outcome) when it is `Some`.
    async fn read_schema(
        &self,
        database_path: &str,
        table_name: Option<&str>,
    ) -> Result<SchemaOutcome, SchemaError>;
}
