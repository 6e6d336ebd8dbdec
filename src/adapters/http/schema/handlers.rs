//! HTTP handler for `GET /schema`, a thin wrapper over the Schema Reader
//! (C3) — spec.md §6.

use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, Json};

use crate::ports::SchemaOutcome;

use super::super::chat::ErrorBody;
use super::super::AppState;
use super::dto::{SchemaHttpQuery, SchemaHttpResponse};

pub async fn schema(State(state): State<AppState>, Query(query): Query<SchemaHttpQuery>) -> impl IntoResponse {
    let database_path = match state.uploads.resolve(&query.filename) {
        Ok(path) => path,
        Err(_) => return (StatusCode::BAD_REQUEST, Json(ErrorBody::new("invalid filename"))).into_response(),
    };

    match state
        .schema_reader
        .read_schema(&database_path.to_string_lossy(), query.table_name.as_deref())
        .await
    {
        Ok(SchemaOutcome::Full(schema)) => (StatusCode::OK, Json(SchemaHttpResponse::full(schema))).into_response(),
        Ok(SchemaOutcome::Table(table)) => (StatusCode::OK, Json(SchemaHttpResponse::table(table))).into_response(),
        Ok(SchemaOutcome::TableNotFound { requested, available }) => {
            (StatusCode::NOT_FOUND, Json(SchemaHttpResponse::table_not_found(requested, available))).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "schema read failed");
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string()))).into_response()
        }
    }
}
