//! `dbchat-server` — runnable HTTP binary (C13).
//!
//! Loads configuration, wires the Anthropic provider and SQLite adapters
//! into the chat orchestrator, and serves the `/chat`, `/query`, `/schema`
//! routes plus a health check.

use dbchat_engine::adapters::http::build_router;
use dbchat_engine::application::build_app_state;
use dbchat_engine::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = AppConfig::load().expect("failed to load configuration");
    config.validate().expect("invalid configuration");

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(config.server.log_level.clone()))
        .init();

    let socket_addr = config.server.socket_addr();
    let state = build_app_state(&config);
    let router = build_router(state, &config.server);

    tracing::info!(%socket_addr, environment = ?config.server.environment, "starting dbchat-engine");

    let listener = tokio::net::TcpListener::bind(socket_addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind {socket_addr}: {err}"));

    axum::serve(listener, router).await.expect("server error");
}
