//! Application handlers.
//!
//! Command and query handlers that orchestrate the identity ports.

pub mod auth;

pub use auth::{
    CompleteSignInCommand, CompleteSignInHandler, FetchAccessTokenHandler, FetchAccessTokenQuery,
    SignInCommand, SignInHandler, SignOutCommand, SignOutHandler,
};
