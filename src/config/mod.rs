//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the `DBCHAT`
//! prefix and nested values use `__` (double underscore) as separators.
//!
//! # Example
//!
//! ```no_run
//! use dbchat_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod features;
mod server;
mod uploads;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use server::{Environment, ServerConfig};
pub use uploads::UploadsConfig;

use serde::Deserialize;

/// Root application configuration.
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, log level).
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM provider configuration (C7).
    #[serde(default)]
    pub ai: AiConfig,

    /// Root directory that `databasePath`/`filename` are resolved against.
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Feature flags.
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// 1. Loads a `.env` file if present (development convenience).
    /// 2. Reads environment variables with the `DBCHAT` prefix.
    /// 3. Uses `__` (double underscore) to separate nested values, e.g.
    ///    `DBCHAT__SERVER__PORT=8080` -> `server.port = 8080`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DBCHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Performs semantic validation beyond what deserialization checks:
    /// non-zero port, non-empty model name, uploads directory configured,
    /// at least one AI provider credential present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.uploads.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("DBCHAT__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        env::remove_var("DBCHAT__AI__ANTHROPIC_API_KEY");
        env::remove_var("DBCHAT__SERVER__PORT");
        env::remove_var("DBCHAT__SERVER__ENVIRONMENT");
        env::remove_var("DBCHAT__UPLOADS__ROOT");
    }

    #[test]
    fn load_succeeds_with_minimal_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "failed to load config: {:?}", result.err());
    }

    #[test]
    fn validate_passes_with_minimal_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_defaults_are_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn is_production_reflects_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DBCHAT__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn custom_server_port_overrides_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DBCHAT__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }

    #[test]
    fn validate_fails_without_any_ai_credential() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();
        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
