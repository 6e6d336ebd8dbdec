//! HTTP handler for `POST /query`, a thin wrapper over the Query Executor
//! (C2) — spec.md §6.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::domain::sql::{validate_query, SqlMode};
use crate::ports::clamp_page_size;

use super::super::AppState;
use super::super::chat::ErrorBody;
use super::dto::{QueryHttpRequest, QueryHttpResponse};

const WIDGET_PAGE_SIZE_DEFAULT: u32 = 50;
const WIDGET_PAGE_SIZE_MAX: u32 = 1000;

pub async fn query(State(state): State<AppState>, Json(request): Json<QueryHttpRequest>) -> impl IntoResponse {
    let database_path = match state.uploads.resolve(&request.filename) {
        Ok(path) => path,
        Err(_) => return (StatusCode::BAD_REQUEST, Json(ErrorBody::new("invalid filename"))).into_response(),
    };

    if let Err(err) = validate_query(&request.query, SqlMode::Widget) {
        return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.0))).into_response();
    }

    let page = request.page.unwrap_or(1).max(1);
    let page_size = clamp_page_size(request.page_size, WIDGET_PAGE_SIZE_DEFAULT, WIDGET_PAGE_SIZE_MAX);

    match state
        .query_executor
        .execute(&database_path.to_string_lossy(), &request.query, page, page_size)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(QueryHttpResponse::from(result))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "query execution failed");
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string()))).into_response()
        }
    }
}
