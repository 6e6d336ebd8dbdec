//! Axum router for the chat endpoint.

use axum::{routing::post, Router};

use super::super::AppState;
use super::handlers::chat;

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_is_defined() {
        let _router = chat_routes();
    }
}
