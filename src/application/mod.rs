//! Application layer — composition root.
//!
//! Wires the configured adapters (C7 Anthropic provider, C2/C3 SQLite
//! adapters) into the domain's [`ChatOrchestrator`] and the HTTP layer's
//! [`AppState`], the way `src/bin/server.rs` needs at startup. This crate's
//! single use case is the chat loop itself, so there is no separate
//! command/handler fan-out the way the teacher's multi-feature application
//! layer has one per use case — the orchestrator already plays that role.

pub mod bootstrap;

pub use bootstrap::build_app_state;
