//! HTTP adapters — the `axum` surface (C9): `POST /chat`, `POST /query`,
//! `GET /schema`, plus a health check, all mounted on one shared [`AppState`].

pub mod chat;
pub mod query;
pub mod schema;

pub use chat::{ChatHttpRequest, ChatHttpResponse, ErrorBody};
pub use query::{QueryHttpRequest, QueryHttpResponse};
pub use schema::{SchemaHttpQuery, SchemaHttpResponse};

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ServerConfig, UploadsConfig};
use crate::domain::orchestrator::ChatOrchestrator;
use crate::ports::{QueryExecutor, SchemaReader};

/// Shared state for every handler in this module.
///
/// Cheap to clone: every field is an `Arc` or already-`Clone` value, matching
/// axum's `State<S>: Clone` requirement.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub query_executor: Arc<dyn QueryExecutor>,
    pub schema_reader: Arc<dyn SchemaReader>,
    pub uploads: UploadsConfig,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        query_executor: Arc<dyn QueryExecutor>,
        schema_reader: Arc<dyn SchemaReader>,
        uploads: UploadsConfig,
    ) -> Self {
        Self { orchestrator, query_executor, schema_reader, uploads }
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Assembles the full application router: the three API routes, a health
/// check, and the cross-cutting middleware (request tracing, a request
/// timeout distinct from the orchestrator's own 5-minute workflow deadline,
/// and CORS per [`ServerConfig::cors_origins_list`]).
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = cors_layer(server_config);

    Router::new()
        .route("/health", get(health))
        .merge(chat::chat_routes())
        .merge(query::query_routes())
        .merge(schema::schema_routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(server_config.request_timeout_secs)))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(server_config: &ServerConfig) -> CorsLayer {
    let origins = server_config.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<axum::http::HeaderValue> =
        origins.iter().filter_map(|origin| origin.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockAIProvider, SqliteQueryExecutor, SqliteSchemaReader};
    use crate::domain::tools::ToolRegistry;

    fn test_state() -> AppState {
        let query_executor: Arc<dyn QueryExecutor> = Arc::new(SqliteQueryExecutor::new());
        let schema_reader: Arc<dyn SchemaReader> = Arc::new(SqliteSchemaReader::new());
        let registry = Arc::new(ToolRegistry::standard(query_executor.clone(), schema_reader.clone()));
        let provider = Arc::new(MockAIProvider::new());
        let orchestrator = Arc::new(ChatOrchestrator::new(provider, registry));
        AppState::new(orchestrator, query_executor, schema_reader, UploadsConfig::default())
    }

    #[test]
    fn router_builds_with_default_config() {
        let _router = build_router(test_state(), &ServerConfig::default());
    }
}
