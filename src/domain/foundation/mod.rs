//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the knowledge base front end.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AccessToken, AuthError, AuthState, AuthenticatedUser};
pub use errors::ValidationError;
pub use ids::{SessionId, UserId};
pub use timestamp::Timestamp;
