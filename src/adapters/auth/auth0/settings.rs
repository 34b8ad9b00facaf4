//! Resolved Auth0 endpoints and client parameters.

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use crate::config::{AuthConfig, ServerConfig};
use crate::domain::foundation::AuthError;

/// Everything the Auth0 adapter needs, resolved from configuration.
#[derive(Debug, Clone)]
pub struct Auth0Settings {
    /// Tenant base URL without trailing slash, e.g. `https://tenant.eu.auth0.com`
    pub base_url: String,
    pub client_id: String,
    pub client_secret: Option<SecretString>,
    /// Default API audience for access tokens
    pub audience: String,
    pub scope: String,
    /// Callback URL registered with the Auth0 application
    pub redirect_uri: String,
    pub login_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub http_timeout: Duration,
    pub jwks_cache_ttl: Duration,
}

impl Auth0Settings {
    pub fn from_config(auth: &AuthConfig, server: &ServerConfig) -> Self {
        Self {
            base_url: auth.base_url(),
            client_id: auth.client_id.clone(),
            client_secret: auth.client_secret.clone(),
            audience: auth.audience.clone(),
            scope: auth.effective_scope(),
            redirect_uri: server.callback_url(),
            login_timeout_secs: auth.login_timeout_secs,
            session_ttl_secs: auth.session_ttl_secs,
            http_timeout: auth.http_timeout(),
            jwks_cache_ttl: auth.jwks_cache_ttl(),
        }
    }

    /// Points the adapter at another host (local fakes in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Expected `iss` claim of ID tokens.
    pub fn issuer(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.base_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    /// Builds the `/authorize` URL for one login.
    pub fn authorize_url(
        &self,
        state: &str,
        nonce: &str,
        code_challenge: &str,
    ) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.base_url),
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("audience", self.audience.as_str()),
                ("state", state),
                ("nonce", nonce),
                ("code_challenge", code_challenge),
                ("code_challenge_method", "S256"),
            ],
        )
        .map_err(|e| AuthError::service_unavailable(format!("Invalid authorize URL: {}", e)))?;
        Ok(url.into())
    }

    /// Builds the `/v2/logout` URL that ends the Auth0 session.
    pub fn logout_url(&self, return_to: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &format!("{}/v2/logout", self.base_url),
            &[
                ("client_id", self.client_id.as_str()),
                ("returnTo", return_to),
            ],
        )
        .map_err(|e| AuthError::service_unavailable(format!("Invalid logout URL: {}", e)))?;
        Ok(url.into())
    }
}
