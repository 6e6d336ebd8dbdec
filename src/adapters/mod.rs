//! Adapters — implementations of the port interfaces (hexagonal boundary).
//!
//! - `ai` — LLM provider implementations (Anthropic, mock) for the
//!   `AIProvider` port (C7).
//! - `sqlite` — read-only SQLite implementations of `QueryExecutor` (C2) and
//!   `SchemaReader` (C3).
//! - `http` — the `axum` HTTP surface (C9).

pub mod ai;
pub mod http;
pub mod sqlite;

pub use ai::{AnthropicConfig, AnthropicProvider, MockAIProvider, MockError, MockResponse};
pub use sqlite::{SqliteQueryExecutor, SqliteSchemaReader};
