//! Chat HTTP adapter — `POST /chat` (C9), the orchestrator's (C8) only
//! direct HTTP entry point.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ChatHttpRequest, ChatHttpResponse, ErrorBody};
pub use routes::chat_routes;
