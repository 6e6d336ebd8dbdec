//! Axum router for the schema endpoint.

use axum::{routing::get, Router};

use super::super::AppState;
use super::handlers::schema;

pub fn schema_routes() -> Router<AppState> {
    Router::new().route("/schema", get(schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_is_defined() {
        let _router = schema_routes();
    }
}
