//! Client for the Auth0 `/oauth/token` endpoint.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::AuthError;

use super::settings::Auth0Settings;

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth 2.0 error body (RFC 6749 section 5.2).
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Posts grants to the token endpoint.
pub struct TokenClient {
    http_client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: Option<SecretString>,
    redirect_uri: String,
}

impl TokenClient {
    pub fn new(settings: &Auth0Settings) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .build()
            .map_err(|e| {
                AuthError::service_unavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            token_url: settings.token_url(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
        })
    }

    /// `authorization_code` grant with the PKCE verifier of the login.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.post(vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", code_verifier),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// `refresh_token` grant for an access token of `audience`.
    pub async fn refresh(
        &self,
        refresh_token: &SecretString,
        audience: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.post(vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret().as_str()),
            ("audience", audience),
        ])
        .await
    }

    async fn post(&self, mut form: Vec<(&str, &str)>) -> Result<TokenResponse, AuthError> {
        form.push(("client_id", self.client_id.as_str()));
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.expose_secret().as_str()));
        }

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token request failed: {}", e);
                AuthError::service_unavailable(format!("Token request failed: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<TokenResponse>().await.map_err(|e| {
                tracing::error!("Failed to parse token response: {}", e);
                AuthError::service_unavailable(format!("Failed to parse token response: {}", e))
            });
        }

        if status.is_client_error() {
            if let Ok(body) = response.json::<OAuthErrorBody>().await {
                tracing::warn!(error = %body.error, "Token endpoint rejected grant");
                return Err(AuthError::ProviderRejected {
                    error: body.error,
                    description: body.error_description,
                });
            }
        }

        tracing::error!("Token endpoint returned {}", status);
        Err(AuthError::service_unavailable(format!(
            "Token endpoint returned {}",
            status
        )))
    }
}

impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
