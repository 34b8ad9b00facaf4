//! Mock identity provider for testing.
//!
//! Implements both `IdentityProvider` and `LoginFlow` against an in-memory
//! table of fabricated session states, so guards, handlers and routers can
//! be exercised without a real Auth0 tenant.
//!
//! # Example
//!
//! ```ignore
//! use knowledge_base::adapters::auth::MockIdentityProvider;
//! use knowledge_base::domain::foundation::{AuthState, SessionId};
//!
//! let session = SessionId::new();
//! let provider = MockIdentityProvider::new()
//!     .with_session(session, AuthState::Loading);
//!
//! assert_eq!(provider.auth_state(Some(&session)).await, AuthState::Loading);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{
    AccessToken, AuthError, AuthState, AuthenticatedUser, SessionId, Timestamp, UserId,
};
use crate::domain::routing::ReturnTo;
use crate::ports::{
    CompletedLogin, IdentityProvider, LoginCallback, LoginFlow, LoginRedirect, LogoutRedirect,
    TokenRequest,
};

/// Authorize/logout host used in the redirects this mock hands out.
pub const MOCK_IDP_BASE: &str = "https://mock-idp.test";

/// Audience assumed when a token request does not name one.
pub const MOCK_DEFAULT_AUDIENCE: &str = "https://knowledge-base-api/";

/// Mock identity provider.
///
/// Unknown sessions read as `Unauthenticated`. Token fetches succeed only
/// for `Authenticated` sessions unless an error is forced.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    states: RwLock<HashMap<SessionId, AuthState>>,
    users: RwLock<HashMap<SessionId, AuthenticatedUser>>,
    pending_logins: RwLock<HashMap<SessionId, ReturnTo>>,
    token_value: RwLock<Option<String>>,
    force_token_error: RwLock<Option<AuthError>>,
    logouts: RwLock<Vec<(SessionId, String)>>,
}

impl MockIdentityProvider {
    /// Creates a new empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fabricates a session in the given state.
    pub fn with_session(self, session: SessionId, state: AuthState) -> Self {
        self.set_state(session, state);
        self
    }

    /// Fabricates an authenticated session owned by `user`.
    pub fn with_user(self, session: SessionId, user: AuthenticatedUser) -> Self {
        self.set_state(session, AuthState::Authenticated);
        self.users.write().unwrap().insert(session, user);
        self
    }

    /// Token value handed out by `access_token`.
    pub fn with_token(self, value: impl Into<String>) -> Self {
        *self.token_value.write().unwrap() = Some(value.into());
        self
    }

    /// Forces every token fetch to fail with `error`.
    pub fn with_token_error(self, error: AuthError) -> Self {
        *self.force_token_error.write().unwrap() = Some(error);
        self
    }

    /// Changes a session's state at runtime.
    pub fn set_state(&self, session: SessionId, state: AuthState) {
        self.states.write().unwrap().insert(session, state);
    }

    /// Sessions passed to `logout`, with their return URLs.
    pub fn logouts(&self) -> Vec<(SessionId, String)> {
        self.logouts.read().unwrap().clone()
    }

    /// Logins started but not yet completed.
    pub fn pending_login_count(&self) -> usize {
        self.pending_logins.read().unwrap().len()
    }

    fn state_of(&self, session: &SessionId) -> AuthState {
        self.states
            .read()
            .unwrap()
            .get(session)
            .copied()
            .unwrap_or(AuthState::Unauthenticated)
    }

    fn test_user(session: &SessionId) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(format!("mock|{}", session)).unwrap(),
            Some("reader@knowledge-base.test".to_string()),
            Some("Test Reader".to_string()),
            true,
        )
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn auth_state(&self, session: Option<&SessionId>) -> AuthState {
        session
            .map(|id| self.state_of(id))
            .unwrap_or(AuthState::Unauthenticated)
    }

    async fn current_user(&self, session: &SessionId) -> Option<AuthenticatedUser> {
        if !self.state_of(session).is_authenticated() {
            return None;
        }
        let users = self.users.read().unwrap();
        Some(
            users
                .get(session)
                .cloned()
                .unwrap_or_else(|| Self::test_user(session)),
        )
    }

    async fn access_token(
        &self,
        session: &SessionId,
        request: &TokenRequest,
    ) -> Result<AccessToken, AuthError> {
        if let Some(error) = self.force_token_error.read().unwrap().clone() {
            return Err(error);
        }
        if !self.state_of(session).is_authenticated() {
            return Err(AuthError::LoginRequired);
        }
        let value = self
            .token_value
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("mock-token-{}", session));
        let audience = request
            .audience
            .clone()
            .unwrap_or_else(|| MOCK_DEFAULT_AUDIENCE.to_string());
        Ok(AccessToken::new(value, audience, Timestamp::now().plus_secs(3600)))
    }

    async fn logout(
        &self,
        session: &SessionId,
        return_to: &str,
    ) -> Result<LogoutRedirect, AuthError> {
        self.states.write().unwrap().remove(session);
        self.users.write().unwrap().remove(session);
        self.logouts
            .write()
            .unwrap()
            .push((*session, return_to.to_string()));
        Ok(LogoutRedirect {
            url: format!("{}/v2/logout?returnTo={}", MOCK_IDP_BASE, return_to),
        })
    }
}

#[async_trait]
impl LoginFlow for MockIdentityProvider {
    async fn begin_login(&self, return_to: ReturnTo) -> Result<LoginRedirect, AuthError> {
        let session_id = SessionId::new();
        self.pending_logins
            .write()
            .unwrap()
            .insert(session_id, return_to);
        Ok(LoginRedirect {
            session_id,
            authorize_url: format!("{}/authorize?state={}", MOCK_IDP_BASE, session_id),
        })
    }

    /// The mock uses the session id itself as the `state` value.
    async fn complete_login(
        &self,
        session: &SessionId,
        callback: LoginCallback,
    ) -> Result<CompletedLogin, AuthError> {
        let expected_state = session.to_string();

        match callback {
            LoginCallback::Denied {
                state,
                error,
                description,
            } => {
                if state.as_deref() == Some(expected_state.as_str()) {
                    self.pending_logins.write().unwrap().remove(session);
                }
                Err(AuthError::ProviderRejected { error, description })
            }
            LoginCallback::Authorized { state, .. } if state == expected_state => {
                let return_to = self
                    .pending_logins
                    .write()
                    .unwrap()
                    .remove(session)
                    .ok_or(AuthError::InvalidState)?;
                let user = Self::test_user(session);
                self.set_state(*session, AuthState::Authenticated);
                self.users.write().unwrap().insert(*session, user.clone());
                Ok(CompletedLogin { user, return_to })
            }
            LoginCallback::Authorized { .. } => Err(AuthError::InvalidState),
        }
    }

    async fn discard(&self, session: &SessionId) {
        self.states.write().unwrap().remove(session);
        self.users.write().unwrap().remove(session);
        self.pending_logins.write().unwrap().remove(session);
    }
}
