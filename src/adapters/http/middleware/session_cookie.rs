//! Browser session cookie and the `CurrentSession` extractor.
//!
//! The cookie only carries an opaque `SessionId`; everything the session
//! means lives with the identity provider.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::AppConfig;
use crate::domain::foundation::SessionId;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "kb_session";

/// Attributes of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// Only send over HTTPS.
    pub secure: bool,
    pub max_age_secs: u64,
}

impl CookieSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            secure: config.server.cookie_secure(),
            max_age_secs: config.auth.session_ttl_secs,
        }
    }

    /// Cookie binding the browser to `session`.
    pub fn session_cookie(&self, session: SessionId) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(
                i64::try_from(self.max_age_secs).unwrap_or(i64::MAX),
            ))
            .build()
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: false,
            max_age_secs: 86400,
        }
    }
}

/// Session id from the request cookies. A malformed value counts as absent.
pub fn session_from_jar(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Removes the session cookie from `jar`.
pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Session of a request that passed the route guard.
///
/// The guard inserts it into request extensions before running the
/// protected handler, so it is only available behind `route_guard`.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(CurrentSession(session): CurrentSession) -> impl IntoResponse {
///     format!("Session {}", session)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSession(pub SessionId);

impl<S> axum::extract::FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<CurrentSession>()
                .copied()
                .ok_or(SessionRejection::Unauthenticated)
        })
    }
}

/// Rejection when a handler needs a session the guard did not grant.
#[derive(Debug, Clone)]
pub enum SessionRejection {
    Unauthenticated,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionRejection::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::{header, Request};

    fn jar_with(value: &str) -> CookieJar {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("{}={}", SESSION_COOKIE, value).parse().unwrap(),
        );
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn session_cookie_attributes() {
        let session = SessionId::new();
        let cookie = CookieSettings {
            secure: true,
            max_age_secs: 3600,
        }
        .session_cookie(session);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), session.to_string());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn session_is_read_from_cookie() {
        let session = SessionId::new();
        assert_eq!(
            session_from_jar(&jar_with(&session.to_string())),
            Some(session)
        );
    }

    #[test]
    fn malformed_cookie_is_ignored() {
        assert_eq!(session_from_jar(&jar_with("not-a-uuid")), None);
        assert_eq!(session_from_jar(&CookieJar::new()), None);
    }

    #[tokio::test]
    async fn current_session_reads_extensions() {
        let session = SessionId::new();
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(CurrentSession(session));

        let extracted = CurrentSession::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, CurrentSession(session));
    }

    #[tokio::test]
    async fn current_session_missing_is_401() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let rejection = CurrentSession::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
