//! Integration tests for the guarded routes.
//!
//! These tests drive the full router (route guard, pages, login endpoints)
//! against the mock identity provider:
//! 1. Loading sessions see a placeholder, never the content
//! 2. Authenticated sessions see the document overview
//! 3. Unauthenticated requests are redirected to `/`
//! 4. A failed token fetch is reported and leaves the session signed in

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use knowledge_base::adapters::auth::{MockIdentityProvider, MOCK_IDP_BASE};
use knowledge_base::adapters::http::middleware::{CookieSettings, SESSION_COOKIE};
use knowledge_base::adapters::http::{build, AppState};
use knowledge_base::domain::foundation::{AuthError, AuthState, SessionId};
use knowledge_base::ports::IdentityProvider;

// =============================================================================
// Test Infrastructure
// =============================================================================

const LOGOUT_RETURN: &str = "http://localhost:8080";

fn app(provider: &Arc<MockIdentityProvider>) -> Router {
    let state = AppState::new(provider.clone(), CookieSettings::default(), LOGOUT_RETURN);
    build(state, Duration::from_secs(5))
}

fn request(method: &str, uri: &str, session: Option<SessionId>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, session));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Session id from the `Set-Cookie` header, if one was issued.
fn issued_session(response: &Response<Body>) -> Option<SessionId> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix(&format!("{}=", SESSION_COOKIE)))
        .and_then(|v| v.split(';').next())
        .and_then(|v| v.parse().ok())
}

// =============================================================================
// Route guard scenarios
// =============================================================================

#[tokio::test]
async fn loading_session_sees_placeholder_only() {
    let session = SessionId::new();
    let provider = Arc::new(MockIdentityProvider::new().with_session(session, AuthState::Loading));

    let response = send(app(&provider), request("GET", "/protected", Some(session))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    let body = body_text(response).await;
    assert!(body.contains("Loading ..."));
    assert!(!body.contains("Print Access Token"));
}

#[tokio::test]
async fn authenticated_session_sees_document_overview() {
    let session = SessionId::new();
    let provider = Arc::new(
        MockIdentityProvider::new().with_session(session, AuthState::Authenticated),
    );

    let response = send(app(&provider), request("GET", "/protected", Some(session))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Print Access Token"));
    assert!(body.contains("Logout"));
    assert!(!body.contains("Loading ..."));
}

#[tokio::test]
async fn unauthenticated_request_is_redirected_home() {
    let provider = Arc::new(MockIdentityProvider::new());

    let no_cookie = send(app(&provider), request("GET", "/protected", None)).await;
    assert_eq!(no_cookie.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&no_cookie), "/");

    let unknown = send(
        app(&provider),
        request("GET", "/protected", Some(SessionId::new())),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&unknown), "/");
}

#[tokio::test]
async fn malformed_cookie_counts_as_unauthenticated() {
    let provider = Arc::new(MockIdentityProvider::new());
    let req = Request::builder()
        .uri("/protected")
        .header(header::COOKIE, format!("{}=garbage", SESSION_COOKIE))
        .body(Body::empty())
        .unwrap();

    let response = send(app(&provider), req).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn failed_token_fetch_is_reported_and_session_kept() {
    let session = SessionId::new();
    let provider = Arc::new(
        MockIdentityProvider::new()
            .with_session(session, AuthState::Authenticated)
            .with_token_error(AuthError::LoginRequired),
    );

    let response = send(
        app(&provider),
        request("POST", "/protected/token", Some(session)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "LOGIN_REQUIRED");
    assert_eq!(
        provider.auth_state(Some(&session)).await,
        AuthState::Authenticated
    );

    let page = send(app(&provider), request("GET", "/protected", Some(session))).await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn provider_outage_during_token_fetch_is_503() {
    let session = SessionId::new();
    let provider = Arc::new(
        MockIdentityProvider::new()
            .with_session(session, AuthState::Authenticated)
            .with_token_error(AuthError::service_unavailable("tenant down")),
    );

    let response = send(
        app(&provider),
        request("POST", "/protected/token", Some(session)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert!(!body["error"].as_str().unwrap().contains("tenant down"));
}

// =============================================================================
// Token, login and logout endpoints
// =============================================================================

#[tokio::test]
async fn token_endpoint_prints_access_token() {
    let session = SessionId::new();
    let provider = Arc::new(
        MockIdentityProvider::new()
            .with_session(session, AuthState::Authenticated)
            .with_token("eyJ.mock.token"),
    );

    let response = send(
        app(&provider),
        request("POST", "/protected/token", Some(session)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["access_token"], "eyJ.mock.token");
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["audience"], "https://knowledge-base-api/");
}

#[tokio::test]
async fn token_endpoint_is_guarded() {
    let provider = Arc::new(MockIdentityProvider::new().with_token("eyJ.mock.token"));

    let response = send(app(&provider), request("POST", "/protected/token", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn login_round_trip_reaches_protected_page() {
    let provider = Arc::new(MockIdentityProvider::new());

    let login = send(app(&provider), request("GET", "/login", None)).await;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    assert!(location(&login).starts_with(MOCK_IDP_BASE));
    let session = issued_session(&login).expect("login sets the session cookie");

    let callback = send(
        app(&provider),
        request(
            "GET",
            &format!("/callback?code=abc&state={}", session),
            Some(session),
        ),
    )
    .await;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/protected");

    let page = send(app(&provider), request("GET", "/protected", Some(session))).await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("Test Reader"));
}

#[tokio::test]
async fn login_honours_local_return_to() {
    let provider = Arc::new(MockIdentityProvider::new());

    let login = send(
        app(&provider),
        request("GET", "/login?return_to=%2Fprotected%3Fview%3Dlist", None),
    )
    .await;
    let session = issued_session(&login).unwrap();

    let callback = send(
        app(&provider),
        request(
            "GET",
            &format!("/callback?code=abc&state={}", session),
            Some(session),
        ),
    )
    .await;
    assert_eq!(location(&callback), "/protected?view=list");
}

#[tokio::test]
async fn login_rejects_external_return_to() {
    let provider = Arc::new(MockIdentityProvider::new());

    let response = send(
        app(&provider),
        request("GET", "/login?return_to=%2F%2Fevil.example.com", None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.pending_login_count(), 0);
}

#[tokio::test]
async fn callback_without_session_cookie_is_rejected() {
    let provider = Arc::new(MockIdentityProvider::new());

    let response = send(
        app(&provider),
        request("GET", "/callback?code=abc&state=xyz", None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");
}

#[tokio::test]
async fn denied_callback_reports_provider_error() {
    let provider = Arc::new(MockIdentityProvider::new());
    let login = send(app(&provider), request("GET", "/login", None)).await;
    let session = issued_session(&login).unwrap();

    let response = send(
        app(&provider),
        request(
            "GET",
            &format!(
                "/callback?error=access_denied&error_description=denied&state={}",
                session
            ),
            Some(session),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "PROVIDER_REJECTED");
}

fn clears_session_cookie(response: &Response<Body>) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&format!("{}=", SESSION_COOKIE)) && v.contains("Max-Age=0"))
}

#[tokio::test]
async fn stray_callback_keeps_signed_in_browser_signed_in() {
    let session = SessionId::new();
    let provider = Arc::new(
        MockIdentityProvider::new().with_session(session, AuthState::Authenticated),
    );

    for uri in [
        "/callback?error=access_denied",
        "/callback?error=access_denied&state=forged",
        "/callback?code=abc&state=forged",
    ] {
        let response = send(app(&provider), request("GET", uri, Some(session))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert!(!clears_session_cookie(&response), "{} cleared the cookie", uri);
    }

    assert_eq!(
        provider.auth_state(Some(&session)).await,
        AuthState::Authenticated
    );
    let page = send(app(&provider), request("GET", "/protected", Some(session))).await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn stray_callback_does_not_cancel_login_in_progress() {
    let provider = Arc::new(MockIdentityProvider::new());
    let login = send(app(&provider), request("GET", "/login", None)).await;
    let session = issued_session(&login).unwrap();

    let forged = send(
        app(&provider),
        request(
            "GET",
            "/callback?error=access_denied&state=forged",
            Some(session),
        ),
    )
    .await;
    assert_eq!(forged.status(), StatusCode::BAD_REQUEST);
    assert!(!clears_session_cookie(&forged));
    assert_eq!(provider.pending_login_count(), 1);

    let callback = send(
        app(&provider),
        request(
            "GET",
            &format!("/callback?code=abc&state={}", session),
            Some(session),
        ),
    )
    .await;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/protected");
}

#[tokio::test]
async fn new_login_replaces_previous_session() {
    let previous = SessionId::new();
    let provider = Arc::new(
        MockIdentityProvider::new().with_session(previous, AuthState::Authenticated),
    );

    let login = send(app(&provider), request("GET", "/login", Some(previous))).await;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    let session = issued_session(&login).unwrap();

    assert_ne!(session, previous);
    assert_eq!(
        provider.auth_state(Some(&previous)).await,
        AuthState::Unauthenticated
    );
    assert_eq!(provider.pending_login_count(), 1);
}

#[tokio::test]
async fn logout_ends_session_and_redirects_to_provider() {
    let session = SessionId::new();
    let provider = Arc::new(
        MockIdentityProvider::new().with_session(session, AuthState::Authenticated),
    );

    let response = send(app(&provider), request("POST", "/logout", Some(session))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with(MOCK_IDP_BASE));
    assert!(
        clears_session_cookie(&response),
        "logout clears the session cookie"
    );
    assert_eq!(provider.logouts(), vec![(session, LOGOUT_RETURN.to_string())]);

    let after = send(app(&provider), request("GET", "/protected", Some(session))).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&after), "/");
}

#[tokio::test]
async fn logout_without_session_is_redirected_home() {
    let provider = Arc::new(MockIdentityProvider::new());

    let response = send(app(&provider), request("POST", "/logout", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(provider.logouts().is_empty());
}
