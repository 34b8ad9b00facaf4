//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid public URL: {0}")]
    InvalidPublicUrl(String),

    #[error("Public URL must use HTTPS in production")]
    PublicUrlMustBeHttps,

    #[error("Auth domain must be a bare host name, got {0}")]
    InvalidAuthDomain(String),

    #[error("Auth scope must include 'openid'")]
    ScopeMissingOpenId,

    #[error("Invalid auth duration: {0}")]
    InvalidAuthDuration(&'static str),
}
