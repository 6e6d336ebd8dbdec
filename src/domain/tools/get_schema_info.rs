//! `get_schema_info` (C5, spec §4.5.1): inspect the full schema, or one
//! table's columns and row count.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::conversation::{Context, ToolOutput};
use crate::ports::{SchemaError, SchemaOutcome, SchemaReader};

use super::Tool;

pub struct GetSchemaInfoTool {
    schema_reader: Arc<dyn SchemaReader>,
}

impl GetSchemaInfoTool {
    pub fn new(schema_reader: Arc<dyn SchemaReader>) -> Self {
        Self { schema_reader }
    }
}

#[async_trait]
impl Tool for GetSchemaInfoTool {
    fn name(&self) -> &str {
        "get_schema_info"
    }

    fn description(&self) -> &str {
        "Get the database schema: every table's columns and row count, or detail for one named table."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tableName": {
                    "type": "string",
                    "description": "Name of a specific table to inspect. Omit to get the full schema with every table."
                }
            },
            "required": []
        })
    }

    fn usage_guidance(&self) -> &str {
        "Call this before writing any SQL you haven't already confirmed the shape of. \
         Omit tableName to see every table at once; pass tableName once you know which \
         table you care about to get its exact column names and types."
    }

    fn example_queries(&self) -> &[&str] {
        &[
            "What tables are in this database?",
            "What columns does the orders table have?",
            "Show me the structure of the users table",
        ]
    }

    fn validate_parameters(&self, args: &Value) -> Result<(), String> {
        if let Some(table_name) = args.get("tableName") {
            if !table_name.is_string() {
                return Err("'tableName' must be a string".to_string());
            }
        }
        Ok(())
    }

    async fn execute(&self, args: Value, context: &Context) -> ToolOutput {
        let Some(database_path) = context.database_path.as_deref() else {
            return ToolOutput::failure(
                "schema_error",
                "No database is loaded for this conversation.",
            );
        };

        let table_name = args.get("tableName").and_then(Value::as_str);

        match self.schema_reader.read_schema(database_path, table_name).await {
            Ok(SchemaOutcome::Full(schema)) => {
                let table_names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
                ToolOutput::success(
                    "schema_info",
                    json!({ "tables": schema.tables, "tableNames": table_names }),
                )
            }
            Ok(SchemaOutcome::Table(table)) => {
                ToolOutput::success("schema_info", json!({ "table": table }))
            }
            Ok(SchemaOutcome::TableNotFound { requested, available }) => {
                ToolOutput::failure(
                    "table_not_found",
                    format!("Table '{requested}' does not exist in this database."),
                )
                .with_extra(json!({ "availableTables": available }))
            }
            Err(SchemaError::DatabaseNotFound(path)) => ToolOutput::failure(
                "schema_error",
                format!("Database file not found: {path}"),
            ),
            Err(err) => ToolOutput::failure("schema_error", "Failed to read the database schema.")
                .with_original_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::ports::{ColumnInfo, DatabaseSchema, TableSchema};

    struct StubSchemaReader;

    #[async_trait]
    impl SchemaReader for StubSchemaReader {
        async fn read_schema(
            &self,
            _database_path: &str,
            table_name: Option<&str>,
        ) -> Result<SchemaOutcome, SchemaError> {
            let users = TableSchema {
                name: "users".to_string(),
                columns: vec![ColumnInfo {
                    name: "id".to_string(),
                    type_name: "INTEGER".to_string(),
                    nullable: false,
                    primary_key: true,
                    default_value: None,
                }],
                row_count: 3,
            };
            match table_name {
                None => Ok(SchemaOutcome::Full(DatabaseSchema { tables: vec![users] })),
                Some("users") => Ok(SchemaOutcome::Table(users)),
                Some(other) => Ok(SchemaOutcome::TableNotFound {
                    requested: other.to_string(),
                    available: vec!["users".to_string()],
                }),
            }
        }
    }

    fn tool() -> GetSchemaInfoTool {
        GetSchemaInfoTool::new(Arc::new(StubSchemaReader))
    }

    fn context_with_db() -> Context {
        Context::new(Some("./uploads/d.db".to_string()), vec![])
    }

    #[tokio::test]
    async fn missing_database_path_is_schema_error() {
        let out = tool().execute(json!({}), &Context::default()).await;
        assert!(!out.is_success());
        assert_eq!(out.action(), "schema_error");
    }

    #[tokio::test]
    async fn absent_table_name_returns_full_schema_and_names() {
        let out = tool().execute(json!({}), &context_with_db()).await;
        assert!(out.is_success());
        if let ToolOutput::Success(s) = out {
            assert_eq!(s.data["tableNames"], json!(["users"]));
        } else {
            panic!("expected success");
        }
    }

    #[tokio::test]
    async fn known_table_name_returns_table_detail() {
        let out = tool().execute(json!({"tableName": "users"}), &context_with_db()).await;
        assert!(out.is_success());
    }

    #[tokio::test]
    async fn unknown_table_name_returns_table_not_found_with_available() {
        let out = tool()
            .execute(json!({"tableName": "ghosts"}), &context_with_db())
            .await;
        assert!(!out.is_success());
        assert_eq!(out.action(), "table_not_found");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["availableTables"], json!(["users"]));
    }

    #[test]
    fn validate_parameters_rejects_non_string_table_name() {
        assert!(tool().validate_parameters(&json!({"tableName": 5})).is_err());
        assert!(tool().validate_parameters(&json!({})).is_ok());
    }
}
