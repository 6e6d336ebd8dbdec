//! Query HTTP adapter — `POST /query`, a thin wrapper over C2 (spec.md §6).

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{QueryHttpRequest, QueryHttpResponse};
pub use routes::query_routes;
