//! Login flow port: redirect-based sign-in through the provider.
//!
//! This is the server-side counterpart of the provider SDK's
//! `loginWithRedirect` plus its redirect-callback handling. The flow has
//! two legs:
//!
//! ```text
//! GET /login    -> begin_login    -> 303 to provider authorize URL
//! GET /callback -> complete_login -> 303 to the saved return path
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, SessionId};
use crate::domain::routing::ReturnTo;

/// Result of starting a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    /// Browser session the login transaction is bound to.
    pub session_id: SessionId,
    /// Provider URL the browser must be sent to.
    pub authorize_url: String,
}

/// What the provider sent back to the callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCallback {
    /// The user signed in; `code` is exchanged for tokens.
    Authorized { code: String, state: String },
    /// The provider refused (user cancelled, consent denied, ...).
    Denied {
        state: Option<String>,
        error: String,
        description: Option<String>,
    },
}

/// A finished login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLogin {
    pub user: AuthenticatedUser,
    pub return_to: ReturnTo,
}

/// Drives the provider's interactive login.
///
/// # Contract
///
/// Implementations must:
/// - Bind each login to a fresh session and an unguessable `state`
/// - Reject callbacks whose `state` does not match, or whose login has
///   timed out, with `AuthError::InvalidState`
/// - Report `Loading` for the session while the code exchange is in flight
/// - Map a `Denied` callback to `AuthError::ProviderRejected`, dropping the
///   pending login only when the callback carries its `state`
/// - Leave a pending login or an established session untouched when a
///   callback does not match it
#[async_trait]
pub trait LoginFlow: Send + Sync {
    /// Starts a login that will land on `return_to` once complete.
    async fn begin_login(&self, return_to: ReturnTo) -> Result<LoginRedirect, AuthError>;

    /// Finishes the login bound to `session`.
    async fn complete_login(
        &self,
        session: &SessionId,
        callback: LoginCallback,
    ) -> Result<CompletedLogin, AuthError>;

    /// Forgets whatever is held for `session`, pending or established,
    /// without a provider round trip.
    async fn discard(&self, session: &SessionId);
}
