//! Axum router for the query endpoint.

use axum::{routing::post, Router};

use super::super::AppState;
use super::handlers::query;

pub fn query_routes() -> Router<AppState> {
    Router::new().route("/query", post(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_is_defined() {
        let _router = query_routes();
    }
}
