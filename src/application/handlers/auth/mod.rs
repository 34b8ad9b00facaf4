//! Login, logout and token handlers.

mod complete_sign_in;
mod fetch_access_token;
mod sign_in;
mod sign_out;

pub use complete_sign_in::{CompleteSignInCommand, CompleteSignInHandler};
pub use fetch_access_token::{FetchAccessTokenHandler, FetchAccessTokenQuery};
pub use sign_in::{SignInCommand, SignInHandler};
pub use sign_out::{SignOutCommand, SignOutHandler};
