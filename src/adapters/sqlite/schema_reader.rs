//! `SqliteSchemaReader` — implements `SchemaReader` (C3) via `sqlite_master`
//! and `PRAGMA table_info`.

use async_trait::async_trait;
use rusqlite::Connection;

use crate::ports::{ColumnInfo, DatabaseSchema, SchemaError, SchemaOutcome, SchemaReader, TableSchema};

use super::open_read_only;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteSchemaReader;

impl SqliteSchemaReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SchemaReader for SqliteSchemaReader {
    async fn read_schema(&self, database_path: &str, table_name: Option<&str>) -> Result<SchemaOutcome, SchemaError> {
        let database_path = database_path.to_string();
        let table_name = table_name.map(str::to_string);

        tokio::task::spawn_blocking(move || read_schema_blocking(&database_path, table_name.as_deref()))
            .await
            .map_err(|err| SchemaError::Io(format!("schema read task panicked: {err}")))?
    }
}

fn read_schema_blocking(database_path: &str, table_name: Option<&str>) -> Result<SchemaOutcome, SchemaError> {
    let conn = open_read_only(database_path).map_err(|err| match err {
        crate::ports::QueryExecutionError::DatabaseNotFound(path) => SchemaError::DatabaseNotFound(path),
        other => SchemaError::Io(other.to_string()),
    })?;

    let table_names = list_table_names(&conn)?;

    match table_name {
        None => {
            let tables = table_names.iter().map(|name| read_table_schema(&conn, name)).collect::<Result<Vec<_>, _>>()?;
            Ok(SchemaOutcome::Full(DatabaseSchema { tables }))
        }
        Some(requested) => {
            if !table_names.iter().any(|name| name == requested) {
                return Ok(SchemaOutcome::TableNotFound { requested: requested.to_string(), available: table_names });
            }
            Ok(SchemaOutcome::Table(read_table_schema(&conn, requested)?))
        }
    }
}

fn list_table_names(conn: &Connection) -> Result<Vec<String>, SchemaError> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
        .map_err(|err| SchemaError::Sql(err.to_string()))?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|err| SchemaError::Sql(err.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| SchemaError::Sql(err.to_string()))?;

    Ok(names)
}

fn read_table_schema(conn: &Connection, table_name: &str) -> Result<TableSchema, SchemaError> {
    let quoted = quote_identifier(table_name);

    let mut stmt =
        conn.prepare(&format!("PRAGMA table_info({quoted})")).map_err(|err| SchemaError::Sql(err.to_string()))?;

    let columns = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let type_name: String = row.get(2)?;
            let notnull: i64 = row.get(3)?;
            let default_value: Option<String> = row.get(4)?;
            let pk: i64 = row.get(5)?;
            Ok(ColumnInfo { name, type_name, nullable: notnull == 0, primary_key: pk != 0, default_value })
        })
        .map_err(|err| SchemaError::Sql(err.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| SchemaError::Sql(err.to_string()))?;

    let row_count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {quoted}"), [], |row| row.get(0))
        .map_err(|err| SchemaError::Sql(err.to_string()))?;

    Ok(TableSchema { name: table_name.to_string(), columns, row_count })
}

/// Quotes a SQL identifier, doubling any embedded `"` the way standard SQL
/// escaping requires.
fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
