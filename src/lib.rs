//! dbchat-engine - LLM tool-orchestration engine for interactive database exploration.
//!
//! Upload a SQLite database, explore its schema, build dashboard widgets
//! driven by read-only SQL, and converse with an LLM that invokes
//! server-side tools to inspect schema, run queries, and create/edit
//! widgets. See `domain::orchestrator` for the chat loop and `domain::tools`
//! for the five built-in tools.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
