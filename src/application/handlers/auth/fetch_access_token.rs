//! FetchAccessTokenHandler - Retrieves an API access token for a session.
//!
//! A failed fetch is handed back unchanged: no retry, and the session's
//! `AuthState` stays whatever the provider says it is.

use std::sync::Arc;

use crate::domain::foundation::{AccessToken, AuthError, SessionId};
use crate::ports::{IdentityProvider, TokenRequest};

/// Query for an access token, optionally for a specific API audience.
#[derive(Debug, Clone)]
pub struct FetchAccessTokenQuery {
    pub session_id: SessionId,
    pub audience: Option<String>,
}

/// Handler for access token fetches.
pub struct FetchAccessTokenHandler {
    provider: Arc<dyn IdentityProvider>,
}

impl FetchAccessTokenHandler {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, query: FetchAccessTokenQuery) -> Result<AccessToken, AuthError> {
        let request = TokenRequest {
            audience: query.audience,
        };

        match self.provider.access_token(&query.session_id, &request).await {
            Ok(token) => {
                // Never log the token value itself.
                tracing::info!(
                    session = %query.session_id,
                    audience = token.audience(),
                    expires_at = %token.expires_at(),
                    "Access token issued"
                );
                Ok(token)
            }
            Err(e) if e.is_transient() => {
                tracing::error!(session = %query.session_id, error = %e, "Access token fetch failed");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(session = %query.session_id, error = %e, "Access token fetch rejected");
                Err(e)
            }
        }
    }
}
