//! Auth0 implementation of the identity provider ports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::foundation::{
    AccessToken, AuthError, AuthState, AuthenticatedUser, SessionId, Timestamp,
};
use crate::domain::routing::ReturnTo;
use crate::ports::{
    CompletedLogin, IdTokenVerifier, IdentityProvider, LoginCallback, LoginFlow, LoginRedirect,
    LogoutRedirect, TokenRequest,
};

use super::id_token::JwksIdTokenVerifier;
use super::pkce::{random_token, PkcePair};
use super::session_store::{EstablishedSession, PendingLogin, SessionStore};
use super::settings::Auth0Settings;
use super::token_client::{TokenClient, TokenResponse};

/// Access tokens closer than this to expiry are not handed out again.
const TOKEN_REUSE_LEEWAY_SECS: u64 = 60;

/// Identity provider backed by an Auth0 tenant.
///
/// Holds the provider-side session state for every browser session. The
/// rest of the application only ever sees the derived `AuthState`.
pub struct Auth0IdentityProvider {
    settings: Auth0Settings,
    sessions: SessionStore,
    tokens: TokenClient,
    verifier: Arc<dyn IdTokenVerifier>,
}

impl Auth0IdentityProvider {
    /// Creates a provider that verifies ID tokens against the tenant JWKS.
    pub fn new(settings: Auth0Settings) -> Result<Self, AuthError> {
        let verifier = Arc::new(JwksIdTokenVerifier::new(&settings)?);
        Self::with_verifier(settings, verifier)
    }

    pub fn with_verifier(
        settings: Auth0Settings,
        verifier: Arc<dyn IdTokenVerifier>,
    ) -> Result<Self, AuthError> {
        let tokens = TokenClient::new(&settings)?;
        Ok(Self {
            settings,
            sessions: SessionStore::new(),
            tokens,
            verifier,
        })
    }

    /// Drops expired sessions and abandoned logins every `every`.
    pub fn spawn_session_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                provider.sessions.purge_expired().await;
            }
        })
    }

    /// Upper bound for one code exchange: token request plus JWKS fetch.
    fn exchange_deadline(&self) -> Timestamp {
        let secs = self.settings.http_timeout.as_secs().saturating_mul(2);
        Timestamp::now().plus_secs(secs.saturating_add(1))
    }

    /// Access tokens never outlive the session they belong to.
    fn access_token_from(&self, response: &TokenResponse) -> AccessToken {
        let lifetime = response.expires_in.min(self.settings.session_ttl_secs);
        AccessToken::new(
            response.access_token.clone(),
            self.settings.audience.clone(),
            Timestamp::now().plus_secs(lifetime),
        )
    }

    async fn exchange(
        &self,
        code: &str,
        pending: &PendingLogin,
    ) -> Result<EstablishedSession, AuthError> {
        let response = self
            .tokens
            .exchange_code(code, &pending.code_verifier)
            .await?;

        let id_token = response.id_token.as_deref().ok_or_else(|| {
            tracing::warn!("Token response without ID token");
            AuthError::InvalidToken
        })?;
        let user = self.verifier.verify(id_token, &pending.nonce).await?;

        Ok(EstablishedSession {
            user,
            access_token: self.access_token_from(&response),
            refresh_token: response.refresh_token.clone().map(SecretString::new),
            expires_at: Timestamp::now().plus_secs(self.settings.session_ttl_secs),
        })
    }
}

#[async_trait]
impl IdentityProvider for Auth0IdentityProvider {
    async fn auth_state(&self, session: Option<&SessionId>) -> AuthState {
        match session {
            Some(id) => self.sessions.auth_state(id).await,
            None => AuthState::Unauthenticated,
        }
    }

    async fn current_user(&self, session: &SessionId) -> Option<AuthenticatedUser> {
        self.sessions.established(session).await.map(|s| s.user)
    }

    async fn access_token(
        &self,
        session: &SessionId,
        request: &TokenRequest,
    ) -> Result<AccessToken, AuthError> {
        let established = self
            .sessions
            .established(session)
            .await
            .ok_or(AuthError::LoginRequired)?;

        let audience = request
            .audience
            .as_deref()
            .unwrap_or(&self.settings.audience);
        if audience != established.access_token.audience() {
            tracing::debug!(%session, audience, "Token requested for a different audience");
            return Err(AuthError::LoginRequired);
        }

        if !established
            .access_token
            .expires_within(TOKEN_REUSE_LEEWAY_SECS)
        {
            return Ok(established.access_token);
        }

        let Some(refresh_token) = established.refresh_token else {
            tracing::debug!(%session, "Access token expiring and no refresh token");
            return Err(AuthError::LoginRequired);
        };

        let response = self
            .tokens
            .refresh(&refresh_token, audience)
            .await
            .map_err(|e| match e {
                AuthError::ProviderRejected { error, .. } => {
                    tracing::info!(%session, %error, "Refresh token rejected");
                    AuthError::LoginRequired
                }
                other => other,
            })?;

        let access_token = self.access_token_from(&response);
        self.sessions
            .update_tokens(
                session,
                access_token.clone(),
                response.refresh_token.map(SecretString::new),
            )
            .await;
        tracing::debug!(%session, "Access token refreshed");

        Ok(access_token)
    }

    async fn logout(
        &self,
        session: &SessionId,
        return_to: &str,
    ) -> Result<LogoutRedirect, AuthError> {
        let existed = self.sessions.remove(session).await;
        tracing::debug!(%session, existed, "Session removed");
        Ok(LogoutRedirect {
            url: self.settings.logout_url(return_to)?,
        })
    }
}

#[async_trait]
impl LoginFlow for Auth0IdentityProvider {
    async fn begin_login(&self, return_to: ReturnTo) -> Result<LoginRedirect, AuthError> {
        let session_id = SessionId::new();
        let pkce = PkcePair::generate();
        let pending = PendingLogin {
            state: random_token(),
            nonce: random_token(),
            code_verifier: pkce.code_verifier,
            return_to,
            expires_at: Timestamp::now().plus_secs(self.settings.login_timeout_secs),
        };

        let authorize_url =
            self.settings
                .authorize_url(&pending.state, &pending.nonce, &pkce.code_challenge)?;
        self.sessions.insert_pending(session_id, pending).await;

        Ok(LoginRedirect {
            session_id,
            authorize_url,
        })
    }

    async fn complete_login(
        &self,
        session: &SessionId,
        callback: LoginCallback,
    ) -> Result<CompletedLogin, AuthError> {
        match callback {
            LoginCallback::Denied {
                state,
                error,
                description,
            } => {
                // Only a callback carrying the right state may end the pending login.
                if let Some(state) = state {
                    let cancelled = self.sessions.cancel_pending(session, &state).await;
                    tracing::debug!(%session, cancelled, "Login denied by provider");
                }
                Err(AuthError::ProviderRejected { error, description })
            }
            LoginCallback::Authorized { code, state } => {
                let pending = self
                    .sessions
                    .begin_exchange(session, &state, self.exchange_deadline())
                    .await?;

                match self.exchange(&code, &pending).await {
                    Ok(established) => {
                        let user = established.user.clone();
                        self.sessions.establish(*session, established).await;
                        Ok(CompletedLogin {
                            user,
                            return_to: pending.return_to,
                        })
                    }
                    Err(e) => {
                        self.sessions.remove(session).await;
                        Err(e)
                    }
                }
            }
        }
    }

    async fn discard(&self, session: &SessionId) {
        let existed = self.sessions.remove(session).await;
        tracing::debug!(%session, existed, "Session discarded");
    }
}

impl std::fmt::Debug for Auth0IdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth0IdentityProvider")
            .field("base_url", &self.settings.base_url)
            .field("client_id", &self.settings.client_id)
            .finish_non_exhaustive()
    }
}
