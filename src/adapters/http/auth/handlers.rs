//! HTTP handlers for login, callback, token and logout endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::adapters::http::middleware::{clear_session, session_from_jar, CurrentSession};
use crate::adapters::http::AppState;
use crate::application::handlers::auth::{
    CompleteSignInCommand, FetchAccessTokenQuery, SignInCommand, SignOutCommand,
};
use crate::domain::foundation::AuthError;
use crate::domain::routing::ReturnTo;
use crate::ports::LoginCallback;

use super::dto::{AccessTokenResponse, CallbackQuery, ErrorResponse, LoginQuery, TokenQuery};

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /login - Start a login and send the browser to the provider
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    let return_to = match query.return_to {
        None => ReturnTo::default(),
        Some(path) => match ReturnTo::parse(path) {
            Ok(return_to) => return_to,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(e.to_string())),
                )
                    .into_response()
            }
        },
    };

    let cmd = SignInCommand {
        return_to,
        replaces: session_from_jar(&jar),
    };

    match state.sign_in.handle(cmd).await {
        Ok(redirect) => {
            let jar = jar.add(state.cookies.session_cookie(redirect.session_id));
            (jar, Redirect::to(&redirect.authorize_url)).into_response()
        }
        Err(e) => handle_auth_error(e),
    }
}

/// GET /callback - Finish a login started by `/login`
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(session_id) = session_from_jar(&jar) else {
        return handle_auth_error(AuthError::InvalidState);
    };

    let callback = match query {
        CallbackQuery {
            error: Some(error),
            error_description,
            state: callback_state,
            ..
        } => LoginCallback::Denied {
            state: callback_state,
            error,
            description: error_description,
        },
        CallbackQuery {
            code: Some(code),
            state: Some(callback_state),
            ..
        } => LoginCallback::Authorized {
            code,
            state: callback_state,
        },
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Missing code or state")),
            )
                .into_response()
        }
    };

    match state
        .complete_sign_in
        .handle(CompleteSignInCommand {
            session_id,
            callback,
        })
        .await
    {
        Ok(completed) => Redirect::to(completed.return_to.as_str()).into_response(),
        // Keep the cookie: a failed callback may name a live session, and a
        // removed one already reads as signed out.
        Err(e) => handle_auth_error(e),
    }
}

/// POST /protected/token - Fetch an access token for the API
pub async fn fetch_access_token(
    State(state): State<AppState>,
    CurrentSession(session_id): CurrentSession,
    Query(query): Query<TokenQuery>,
) -> Response {
    let query = FetchAccessTokenQuery {
        session_id,
        audience: query.audience,
    };

    match state.fetch_access_token.handle(query).await {
        Ok(token) => (StatusCode::OK, Json(AccessTokenResponse::from(&token))).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

/// POST /logout - End the session and send the browser to the provider logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    CurrentSession(session_id): CurrentSession,
) -> Response {
    let cmd = SignOutCommand {
        session_id,
        return_to: state.logout_return_url.clone(),
    };

    match state.sign_out.handle(cmd).await {
        Ok(redirect) => (clear_session(jar), Redirect::to(&redirect.url)).into_response(),
        Err(e) => handle_auth_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

/// Maps an `AuthError` to a JSON error response.
pub fn handle_auth_error(error: AuthError) -> Response {
    let status = match &error {
        AuthError::LoginRequired
        | AuthError::SessionNotFound
        | AuthError::InvalidToken
        | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
        AuthError::InvalidState | AuthError::ProviderRejected { .. } => StatusCode::BAD_REQUEST,
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth service unavailable: {}", msg);
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    // Provider outage details stay in the logs.
    let message = match &error {
        AuthError::ServiceUnavailable(_) => "Authentication service unavailable".to_string(),
        other => other.to_string(),
    };

    (status, Json(ErrorResponse::new(error.code(), message))).into_response()
}
