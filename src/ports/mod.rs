//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Identity Ports
//!
//! - `IdentityProvider` - Read-only view of the provider session (state, tokens, logout)
//! - `LoginFlow` - Redirect-based interactive login
//! - `IdTokenVerifier` - ID-token signature and claim verification

mod id_token_verifier;
mod identity_provider;
mod login_flow;

pub use id_token_verifier::IdTokenVerifier;
pub use identity_provider::{IdentityProvider, LogoutRedirect, TokenRequest};
pub use login_flow::{CompletedLogin, LoginCallback, LoginFlow, LoginRedirect};
