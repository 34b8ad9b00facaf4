//! Authentication types for the domain layer.
//!
//! These types describe what the application knows about the current
//! browser session. They have **no provider dependencies**: the Auth0
//! adapter and the test mocks both populate them through the ports in
//! `crate::ports`.
//!
//! The application never mutates authentication state. It reads an
//! [`AuthState`] and reacts to it; the identity provider owns every
//! transition.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

use super::{Timestamp, UserId};

/// Authentication status of one browser session.
///
/// Three variants, no payload. The provider SDK's `isLoading` /
/// `isAuthenticated` boolean pair is folded into this enum so the
/// "loading and authenticated" combination cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// The provider is still establishing the session (login callback in flight).
    Loading,
    /// The provider holds a live session for this browser.
    Authenticated,
    /// No session, or the session ended or expired.
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }
}

/// Authenticated user mapped from verified ID-token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// Email address, if the `email` scope was granted.
    pub email: Option<String>,

    /// Display name if available (`name`, falling back to `nickname`).
    pub display_name: Option<String>,

    /// Whether the provider has verified the email address.
    pub email_verified: bool,
}

impl AuthenticatedUser {
    pub fn new(
        id: UserId,
        email: Option<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            email_verified,
        }
    }

    /// Returns the best human-readable label for the user.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// Bearer token issued by the provider for an API audience.
///
/// The raw value sits behind [`SecretString`] so it never shows up in
/// `Debug` output or logs by accident.
#[derive(Debug, Clone)]
pub struct AccessToken {
    value: SecretString,
    audience: String,
    expires_at: Timestamp,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, audience: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            value: SecretString::new(value.into()),
            audience: audience.into(),
            expires_at,
        }
    }

    /// The raw bearer string.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// True when the token expires within `leeway_secs` from now.
    pub fn expires_within(&self, leeway_secs: u64) -> bool {
        self.expires_at.minus_secs(leeway_secs).has_passed()
    }
}

/// Authentication errors surfaced by the identity provider ports.
///
/// These errors are **domain-centric**: they describe what went wrong
/// from the application's perspective, not in Auth0 vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// A token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The session cannot produce a token without a new interactive login.
    #[error("Login required")]
    LoginRequired,

    /// The login callback did not match a pending login transaction.
    #[error("Login state mismatch or expired")]
    InvalidState,

    /// The browser session is unknown to the provider.
    #[error("Session not found")]
    SessionNotFound,

    /// The provider answered with an OAuth error body.
    #[error("Identity provider rejected the request: {error}")]
    ProviderRejected {
        error: String,
        description: Option<String>,
    },

    /// The identity provider is unreachable or answered garbage.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error means the user has to log in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::LoginRequired
                | AuthError::SessionNotFound
        )
    }

    /// Returns true if this is a transient error that may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }

    /// Stable machine-readable code for HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::LoginRequired => "LOGIN_REQUIRED",
            AuthError::InvalidState => "INVALID_STATE",
            AuthError::SessionNotFound => "SESSION_NOT_FOUND",
            AuthError::ProviderRejected { .. } => "PROVIDER_REJECTED",
            AuthError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}
