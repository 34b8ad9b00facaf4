//! Identity provider port: the read-only view of the provider's session.
//!
//! The provider (Auth0 in production) owns the login session. The
//! application reads its [`AuthState`], asks it for access tokens and asks
//! it to end the session. It never writes session state itself.
//!
//! # Example
//!
//! ```ignore
//! async fn overview(provider: Arc<dyn IdentityProvider>, session: SessionId) {
//!     match provider.auth_state(Some(&session)).await {
//!         AuthState::Authenticated => { /* render */ }
//!         AuthState::Loading => { /* placeholder */ }
//!         AuthState::Unauthenticated => { /* redirect */ }
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{AccessToken, AuthError, AuthState, AuthenticatedUser, SessionId};

/// Parameters for a silent access-token fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRequest {
    /// API audience the token must be issued for. `None` uses the
    /// provider's configured default audience.
    pub audience: Option<String>,
}

impl TokenRequest {
    pub fn for_audience(audience: impl Into<String>) -> Self {
        Self {
            audience: Some(audience.into()),
        }
    }
}

/// Where the browser goes after the provider ends a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutRedirect {
    pub url: String,
}

/// Injected read-only capability over the provider's session.
///
/// # Contract
///
/// Implementations must:
/// - Report `Unauthenticated` for a missing or unknown session
/// - Never change a session's `AuthState` because a token fetch failed
/// - Return `AuthError::LoginRequired` when no token can be produced
///   without an interactive login
/// - Return `AuthError::ServiceUnavailable` for transient provider errors
/// - Treat `logout` as idempotent: an unknown session still yields the
///   provider's logout redirect
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current authentication state of a browser session.
    async fn auth_state(&self, session: Option<&SessionId>) -> AuthState;

    /// The user behind an authenticated session.
    async fn current_user(&self, session: &SessionId) -> Option<AuthenticatedUser>;

    /// Returns a bearer token for the session without user interaction.
    async fn access_token(
        &self,
        session: &SessionId,
        request: &TokenRequest,
    ) -> Result<AccessToken, AuthError>;

    /// Ends the session and returns the provider's logout navigation target.
    async fn logout(&self, session: &SessionId, return_to: &str)
        -> Result<LogoutRedirect, AuthError>;
}
