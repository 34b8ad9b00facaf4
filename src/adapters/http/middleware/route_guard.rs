//! Route guard middleware.
//!
//! Applies the domain `guard` to every request for a protected route:
//!
//! ```text
//! Request ─> read session cookie ─> provider.auth_state() ─> guard(state, next)
//!                                                              │
//!          Placeholder ─> "Loading ..." page (re-polls itself) ┤
//!          Render(next) ─> protected handler                   ┤
//!          Redirect { to } ─> 303 See Other ───────────────────┘
//! ```
//!
//! The protected handler is the `content` handed to the guard: it only runs
//! when the guard renders it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::adapters::http::pages;
use crate::adapters::http::AppState;
use crate::domain::routing::{guard, GuardOutcome};

use super::session_cookie::{session_from_jar, CurrentSession};

pub async fn route_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = session_from_jar(&jar);
    let auth_state = state.provider.auth_state(session.as_ref()).await;

    match guard(auth_state, next) {
        GuardOutcome::Placeholder => pages::loading().into_response(),
        GuardOutcome::Render(next) => {
            if let Some(session) = session {
                request.extensions_mut().insert(CurrentSession(session));
            }
            next.run(request).await
        }
        GuardOutcome::Redirect { to } => {
            tracing::debug!(path = %request.uri().path(), "Unauthenticated request redirected");
            Redirect::to(to).into_response()
        }
    }
}
