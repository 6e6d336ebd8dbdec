//! SQLite adapters (C2, C3) — read-only access to a user-supplied database
//! file. Every call opens its own connection and closes it before returning
//! (RAII via `Connection`'s `Drop`), matching the "opened per request" model
//! in spec.md §5.

mod query_executor;
mod schema_reader;

pub use query_executor::SqliteQueryExecutor;
pub use schema_reader::SqliteSchemaReader;

use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::ports::QueryExecutionError;

/// Matches the 5-second busy timeout required by spec.md §4.2/§5.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens `database_path` read-only with the mandated busy timeout.
///
/// Shared by both adapters so the open/timeout/error-mapping policy stays in
/// one place.
fn open_read_only(database_path: &str) -> Result<Connection, QueryExecutionError> {
    if !std::path::Path::new(database_path).is_file() {
        return Err(QueryExecutionError::DatabaseNotFound(database_path.to_string()));
    }

    let conn = Connection::open_with_flags(database_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|err| QueryExecutionError::Io(err.to_string()))?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(|err| QueryExecutionError::Io(err.to_string()))?;
    Ok(conn)
}

/// Converts a `rusqlite::Error` into the domain's error taxonomy, matching
/// spec.md §7's "missing DB, bad SQL, I/O" classification by inspecting the
/// driver's message text (`rusqlite` doesn't expose a richer error enum for
/// SQLite's own error classes).
fn classify_rusqlite_error(err: rusqlite::Error) -> QueryExecutionError {
    let message = err.to_string();
    let lower = message.to_lowercase();
    if lower.contains("no such table") {
        QueryExecutionError::TableNotFound(message)
    } else if lower.contains("no such column") {
        QueryExecutionError::ColumnNotFound(message)
    } else if lower.contains("syntax error") {
        QueryExecutionError::SyntaxError(message)
    } else {
        QueryExecutionError::Sql(message)
    }
}
