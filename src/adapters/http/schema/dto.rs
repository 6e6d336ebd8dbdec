//! Data transfer objects for `GET /schema`.

use serde::{Deserialize, Serialize};

use crate::ports::{DatabaseSchema, TableSchema};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaHttpQuery {
    pub filename: String,
    pub table_name: Option<String>,
}

/// Response shape mirrors [`crate::ports::SchemaOutcome`], flattened for the
/// wire: `table`/`tables`/`availableTables` are mutually exclusive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaHttpResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_tables: Option<Vec<String>>,
}

impl SchemaHttpResponse {
    pub fn full(schema: DatabaseSchema) -> Self {
        Self { tables: Some(schema.tables), table: None, requested: None, available_tables: None }
    }

    pub fn table(table: TableSchema) -> Self {
        Self { tables: None, table: Some(table), requested: None, available_tables: None }
    }

    pub fn table_not_found(requested: String, available: Vec<String>) -> Self {
        Self { tables: None, table: None, requested: Some(requested), available_tables: Some(available) }
    }
}
