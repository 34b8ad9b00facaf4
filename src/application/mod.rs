//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates operations over the ports. Handlers never touch
//! provider state directly; they go through `IdentityProvider` and `LoginFlow`.

pub mod handlers;

pub use handlers::{
    CompleteSignInCommand, CompleteSignInHandler, FetchAccessTokenHandler, FetchAccessTokenQuery,
    SignInCommand, SignInHandler, SignOutCommand, SignOutHandler,
};
