//! Builds the HTTP layer's [`AppState`] from a validated [`AppConfig`].

use std::sync::Arc;

use crate::adapters::http::AppState;
use crate::adapters::{AnthropicProvider, SqliteQueryExecutor, SqliteSchemaReader};
use crate::config::AppConfig;
use crate::domain::orchestrator::ChatOrchestrator;
use crate::domain::tools::ToolRegistry;
use crate::ports::{AIProvider, QueryExecutor, SchemaReader};

/// Wires the Anthropic provider and the SQLite adapters into one
/// [`AppState`], ready to hand to [`crate::adapters::http::build_router`].
///
/// Assumes `config.validate()` has already been called — this does not
/// re-check credential presence, it relies on the caller having done so.
pub fn build_app_state(config: &AppConfig) -> AppState {
    let query_executor: Arc<dyn QueryExecutor> = Arc::new(SqliteQueryExecutor::new());
    let schema_reader: Arc<dyn SchemaReader> = Arc::new(SqliteSchemaReader::new());
    let registry = Arc::new(ToolRegistry::standard(query_executor.clone(), schema_reader.clone()));

    let provider: Arc<dyn AIProvider> = Arc::new(AnthropicProvider::new((&config.ai).into()));
    let orchestrator = Arc::new(ChatOrchestrator::new(provider, registry));

    AppState::new(orchestrator, query_executor, schema_reader, config.uploads.clone())
}
