//! Schema HTTP adapter — `GET /schema`, a thin wrapper over C3 (spec.md §6).

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{SchemaHttpQuery, SchemaHttpResponse};
pub use routes::schema_routes;
