//! Authentication configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_LOGIN_TIMEOUT_SECS: u64 = 60 * 60;
const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;
const MAX_HTTP_TIMEOUT_SECS: u64 = 120;
const MAX_JWKS_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Authentication configuration (Auth0 tenant and application)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Auth0 tenant domain, e.g. `knowledge-base.eu.auth0.com`
    pub domain: String,

    /// Auth0 application client ID
    pub client_id: String,

    /// Client secret for confidential (regular web) applications
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// API audience requested for access tokens
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Space-separated OIDC scopes
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Request refresh tokens (adds `offline_access`) so access tokens can
    /// be renewed without a new login
    #[serde(default)]
    pub use_refresh_tokens: bool,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,

    /// How long a started login may wait for its callback
    #[serde(default = "default_login_timeout")]
    pub login_timeout_secs: u64,

    /// Lifetime of an established session
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Timeout for calls to the Auth0 endpoints
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl AuthConfig {
    /// Tenant base URL, e.g. `https://knowledge-base.eu.auth0.com`
    pub fn base_url(&self) -> String {
        format!("https://{}", self.domain.trim_end_matches('/'))
    }

    /// Expected `iss` claim. Auth0 issuers carry a trailing slash.
    pub fn issuer(&self) -> String {
        format!("{}/", self.base_url())
    }

    /// Scope sent with the authorize request.
    pub fn effective_scope(&self) -> String {
        let mut scopes: Vec<&str> = self.scope.split_whitespace().collect();
        if self.use_refresh_tokens && !scopes.contains(&"offline_access") {
            scopes.push("offline_access");
        }
        scopes.join(" ")
    }

    /// Get JWKS cache TTL as Duration
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.domain.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__DOMAIN"));
        }
        if self.domain.contains("://") || self.domain.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidAuthDomain(self.domain.clone()));
        }
        if self.client_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__CLIENT_ID"));
        }
        if self.audience.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        if !self.scope.split_whitespace().any(|s| s == "openid") {
            return Err(ValidationError::ScopeMissingOpenId);
        }
        for (name, value, max) in [
            ("login_timeout_secs", self.login_timeout_secs, MAX_LOGIN_TIMEOUT_SECS),
            ("session_ttl_secs", self.session_ttl_secs, MAX_SESSION_TTL_SECS),
            ("http_timeout_secs", self.http_timeout_secs, MAX_HTTP_TIMEOUT_SECS),
            ("jwks_cache_ttl_secs", self.jwks_cache_ttl_secs, MAX_JWKS_CACHE_TTL_SECS),
        ] {
            if value == 0 || value > max {
                return Err(ValidationError::InvalidAuthDuration(name));
            }
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            client_id: String::new(),
            client_secret: None,
            audience: default_audience(),
            scope: default_scope(),
            use_refresh_tokens: false,
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
            login_timeout_secs: default_login_timeout(),
            session_ttl_secs: default_session_ttl(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_audience() -> String {
    "https://knowledge-base-api/".to_string()
}

fn default_scope() -> String {
    "openid profile email".to_string()
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}

fn default_login_timeout() -> u64 {
    600
}

fn default_session_ttl() -> u64 {
    86_400
}

fn default_http_timeout() -> u64 {
    10
}
