//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `KNOWLEDGE_BASE_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use knowledge_base::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Public URL {}", config.server.public_url);
//! ```

mod auth;
mod error;
mod server;

pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, public URL)
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration (Auth0 tenant)
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `KNOWLEDGE_BASE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `KNOWLEDGE_BASE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `KNOWLEDGE_BASE__AUTH__DOMAIN=...` -> `auth.domain = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("KNOWLEDGE_BASE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("KNOWLEDGE_BASE__AUTH__DOMAIN", "knowledge-base.eu.auth0.com");
        env::set_var("KNOWLEDGE_BASE__AUTH__CLIENT_ID", "client-id");
    }

    fn clear_env() {
        for key in [
            "KNOWLEDGE_BASE__AUTH__DOMAIN",
            "KNOWLEDGE_BASE__AUTH__CLIENT_ID",
            "KNOWLEDGE_BASE__AUTH__CLIENT_SECRET",
            "KNOWLEDGE_BASE__SERVER__PORT",
            "KNOWLEDGE_BASE__SERVER__ENVIRONMENT",
            "KNOWLEDGE_BASE__SERVER__PUBLIC_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.auth.domain, "knowledge-base.eu.auth0.com");
        assert_eq!(config.auth.audience, "https://knowledge-base-api/");
        assert!(config.auth.client_secret.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_secret_is_loaded_as_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("KNOWLEDGE_BASE__AUTH__CLIENT_SECRET", "shh");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let secret = config.auth.client_secret.as_ref().unwrap();
        assert_eq!(secret.expose_secret(), "shh");
        assert!(!format!("{:?}", config.auth).contains("shh"));
    }

    #[test]
    fn test_server_defaults() {
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
    fn test_production_requires_https_public_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("KNOWLEDGE_BASE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::PublicUrlMustBeHttps)
        );
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("KNOWLEDGE_BASE__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_missing_auth_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
