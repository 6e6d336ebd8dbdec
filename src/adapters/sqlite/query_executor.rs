//! `SqliteQueryExecutor` — implements `QueryExecutor` (C2) against a
//! read-only SQLite connection opened per call.

use async_trait::async_trait;
use rusqlite::{Connection, Row};
use serde_json::Value;

use crate::ports::{QueryExecutionError, QueryExecutor, QueryResult};

use super::{classify_rusqlite_error, open_read_only};

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteQueryExecutor;

impl SqliteQueryExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QueryExecutor for SqliteQueryExecutor {
    async fn execute(
        &self,
        database_path: &str,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<QueryResult, QueryExecutionError> {
        let database_path = database_path.to_string();
        let query = query.to_string();
        let page = page.max(1);

        tokio::task::spawn_blocking(move || run_query(&database_path, &query, page, page_size))
            .await
            .map_err(|err| QueryExecutionError::Io(format!("query task panicked: {err}")))?
    }
}

fn run_query(database_path: &str, query: &str, page: u32, page_size: u32) -> Result<QueryResult, QueryExecutionError> {
    let conn = open_read_only(database_path)?;

    if has_limit_or_offset(query) {
        let (columns, rows) = execute_rows(&conn, query, &[])?;
        let total_rows = rows.len() as i64;
        return Ok(QueryResult {
            columns,
            total_rows,
            page: 1,
            page_size: rows.len() as u32,
            total_pages: 1,
            has_more: false,
            rows,
        });
    }

    let total_rows = count_rows(&conn, query)?;
    let offset = (page - 1) as i64 * page_size as i64;
    let paginated = format!("{query} LIMIT {page_size} OFFSET {offset}");
    let (columns, rows) = execute_rows(&conn, &paginated, &[])?;

    let total_pages = if page_size == 0 { 1 } else { ((total_rows as f64) / (page_size as f64)).ceil().max(1.0) as u32 };
    let has_more = total_rows > (page as i64) * (page_size as i64);

    Ok(QueryResult { columns, rows, total_rows, page, page_size, total_pages, has_more })
}

/// Detects a whole-word `LIMIT`/`OFFSET` token, the same convention as the
/// widget-mode check in `domain::sql`, but applied regardless of mode here —
/// this is about deciding *how to execute*, not whether the query is allowed.
fn has_limit_or_offset(query: &str) -> bool {
    let lower = query.to_lowercase();
    let padded = format!(" {lower} ");
    [" limit ", " limit(", " offset ", " offset("].iter().any(|token| padded.contains(token))
}

fn count_rows(conn: &Connection, query: &str) -> Result<i64, QueryExecutionError> {
    let wrapped = format!("SELECT COUNT(*) FROM ({query})");
    match conn.query_row(&wrapped, [], |row| row.get::<_, i64>(0)) {
        Ok(count) => Ok(count),
        Err(_) => {
            // Non-countable shapes (e.g. a bare pragma-like SELECT) fall back
            // to counting the bare query's own rows, per spec.md §4.2.
            let (_, rows) = execute_rows(conn, query, &[])?;
            Ok(rows.len() as i64)
        }
    }
}

fn execute_rows(conn: &Connection, query: &str, params: &[&dyn rusqlite::ToSql]) -> Result<(Vec<String>, Vec<Vec<Value>>), QueryExecutionError> {
    let mut stmt = conn.prepare(query).map_err(classify_rusqlite_error)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let rows = stmt
        .query_map(params, |row| row_to_values(row, columns.len()))
        .map_err(classify_rusqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(classify_rusqlite_error)?;

    Ok((columns, rows))
}

fn row_to_values(row: &Row, column_count: usize) -> rusqlite::Result<Vec<Value>> {
    (0..column_count)
        .map(|i| {
            let value: rusqlite::types::ValueRef = row.get_ref(i)?;
            Ok(match value {
                rusqlite::types::ValueRef::Null => Value::Null,
                rusqlite::types::ValueRef::Integer(n) => Value::from(n),
                rusqlite::types::ValueRef::Real(f) => serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
                rusqlite::types::ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
                rusqlite::types::ValueRef::Blob(b) => Value::String(format!("<blob: {} bytes>", b.len())),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection as RusqliteConnection;
    use tempfile::NamedTempFile;

    fn seeded_db() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let conn = RusqliteConnection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER);
             INSERT INTO users (name, age) VALUES ('alice', 30), ('bob', 25), ('carol', NULL);",
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn executes_a_plain_select_with_pagination() {
        let db = seeded_db();
        let executor = SqliteQueryExecutor::new();
        let result = executor
            .execute(db.path().to_str().unwrap(), "SELECT * FROM users ORDER BY id", 1, 2)
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["id", "name", "age"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.total_rows, 3);
        assert!(result.has_more);
    }

    #[tokio::test]
    async fn second_page_has_no_more_rows() {
        let db = seeded_db();
        let executor = SqliteQueryExecutor::new();
        let result = executor
            .execute(db.path().to_str().unwrap(), "SELECT * FROM users ORDER BY id", 2, 2)
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn null_cells_are_preserved() {
        let db = seeded_db();
        let executor = SqliteQueryExecutor::new();
        let result = executor
            .execute(db.path().to_str().unwrap(), "SELECT age FROM users WHERE name = 'carol'", 1, 50)
            .await
            .unwrap();

        assert_eq!(result.rows[0][0], Value::Null);
    }

    #[tokio::test]
    async fn query_with_existing_limit_executes_as_is() {
        let db = seeded_db();
        let executor = SqliteQueryExecutor::new();
        let result = executor
            .execute(db.path().to_str().unwrap(), "SELECT * FROM users ORDER BY id LIMIT 1", 1, 50)
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.total_rows, 1);
        assert!(!result.has_more);
    }

    #[tokio::test]
    async fn missing_database_file_is_reported() {
        let executor = SqliteQueryExecutor::new();
        let err = executor.execute("/no/such/path.db", "SELECT 1", 1, 50).await.unwrap_err();
        assert!(matches!(err, QueryExecutionError::DatabaseNotFound(_)));
    }

    #[tokio::test]
    async fn unknown_table_is_classified_as_table_not_found() {
        let db = seeded_db();
        let executor = SqliteQueryExecutor::new();
        let err = executor
            .execute(db.path().to_str().unwrap(), "SELECT * FROM ghosts", 1, 50)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryExecutionError::TableNotFound(_)));
    }
}
