//! HTTP middleware for axum.
//!
//! - `route_guard` - Gates protected routes on the provider's `AuthState`
//! - `session_cookie` - Session cookie handling and the `CurrentSession` extractor

pub mod route_guard;
pub mod session_cookie;

pub use route_guard::route_guard;
pub use session_cookie::{
    clear_session, session_from_jar, CookieSettings, CurrentSession, SessionRejection,
    SESSION_COOKIE,
};
