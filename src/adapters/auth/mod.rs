//! Authentication adapters.
//!
//! Implementations of the identity ports:
//!
//! - `auth0` - Production Auth0 implementation (authorization code + PKCE)
//! - `mock` - Test implementation with fabricated session states

mod auth0;
mod mock;

pub use auth0::{Auth0IdentityProvider, Auth0Settings, JwksIdTokenVerifier};
pub use mock::{MockIdentityProvider, MOCK_DEFAULT_AUDIENCE, MOCK_IDP_BASE};
