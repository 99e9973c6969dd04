//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AHP_ENGINE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ahp_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Debounce window: {:?}", config.engine.debounce_window());
//! ```

mod engine;
mod error;
mod server;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, HTTP limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Engine configuration (consistency threshold, debounce, scoring)
    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Reads `AHP_ENGINE__<SECTION>__<KEY>` variables, after merging a local
    /// `.env` when one exists.
    ///
    /// `AHP_ENGINE__ENGINE__DEBOUNCE_MS=250` sets `engine.debounce_ms`.
    /// Missing keys keep their defaults; values that fail to parse are a
    /// `ConfigError`.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal outside development.
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AHP_ENGINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks every section, stopping at the first invalid value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.engine.validate()?;
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

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "AHP_ENGINE__SERVER__PORT",
        "AHP_ENGINE__SERVER__ENVIRONMENT",
        "AHP_ENGINE__SERVER__LOG_FORMAT",
        "AHP_ENGINE__ENGINE__CONSISTENCY_THRESHOLD",
        "AHP_ENGINE__ENGINE__DEBOUNCE_MS",
        "AHP_ENGINE__ENGINE__DERIVE_FROM_MAGNITUDES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.engine.debounce_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AHP_ENGINE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port_and_format() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AHP_ENGINE__SERVER__PORT", "3000");
        env::set_var("AHP_ENGINE__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
    }

    #[test]
    fn test_engine_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AHP_ENGINE__ENGINE__CONSISTENCY_THRESHOLD", "0.2");
        env::set_var("AHP_ENGINE__ENGINE__DEBOUNCE_MS", "250");
        env::set_var("AHP_ENGINE__ENGINE__DERIVE_FROM_MAGNITUDES", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let options = config.engine.evaluation_options();
        assert_eq!(options.consistency_threshold, 0.2);
        assert!(!options.derive_from_magnitudes);
        assert_eq!(config.engine.debounce_ms, 250);
    }

    #[test]
    fn test_validate_rejects_bad_engine_section() {
        let config = AppConfig {
            engine: EngineConfig {
                debounce_ms: 60_000,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
