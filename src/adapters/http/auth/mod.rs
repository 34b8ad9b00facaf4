//! HTTP adapter for login, callback, token and logout endpoints.

mod dto;
mod handlers;

pub use dto::{AccessTokenResponse, CallbackQuery, ErrorResponse, LoginQuery, TokenQuery};
pub use handlers::{callback, fetch_access_token, handle_auth_error, login, logout};
