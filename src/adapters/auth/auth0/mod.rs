//! Auth0 adapter.
//!
//! Implements `IdentityProvider`, `LoginFlow` and `IdTokenVerifier` against
//! an Auth0 tenant using the authorization-code flow with PKCE:
//!
//! ```text
//! /login ──> begin_login ──> 303 https://{domain}/authorize?...
//!                                        │
//! /callback?code&state <─────────────────┘
//!     └─> complete_login ──> POST /oauth/token ──> verify ID token (JWKS)
//! ```

mod id_token;
mod pkce;
mod provider;
mod session_store;
mod settings;
mod token_client;

#[cfg(test)]
pub(crate) mod testing;

pub use id_token::JwksIdTokenVerifier;
pub use provider::Auth0IdentityProvider;
pub use settings::Auth0Settings;
