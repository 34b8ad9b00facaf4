//! ID-token verification port.
//!
//! The login flow receives an ID token from the provider's token endpoint.
//! Before the session is trusted the token is verified and its claims are
//! mapped to an [`AuthenticatedUser`].
//!
//! # Security Requirements
//!
//! All implementations MUST validate:
//! - **Signature** against the provider's published keys
//! - **Issuer (iss)**: token must come from the configured tenant
//! - **Audience (aud)**: token must be issued to this client
//! - **Expiry (exp)**: token must not be expired
//! - **Nonce**: must equal the nonce sent with the authorize request

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Verifies ID tokens and extracts the user.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    /// Verify `id_token` and return the user it describes.
    ///
    /// * `Err(AuthError::InvalidToken)` - bad signature, claims or nonce
    /// * `Err(AuthError::TokenExpired)` - signature valid but expired
    /// * `Err(AuthError::ServiceUnavailable)` - signing keys unreachable
    async fn verify(&self, id_token: &str, expected_nonce: &str)
        -> Result<AuthenticatedUser, AuthError>;
}
