//! Server-rendered pages: public home, loading placeholder, document overview.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::adapters::http::middleware::CurrentSession;
use crate::adapters::http::AppState;
use crate::domain::routing::PUBLIC_ENTRY;

const HOME_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Knowledge Base</title></head>
<body>
  <h1>Knowledge Base</h1>
  <a href="/login">Log in</a>
</body>
</html>
"#;

const LOADING_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta http-equiv="refresh" content="1">
  <title>Knowledge Base</title>
</head>
<body><div>Loading ...</div></body>
</html>
"#;

/// GET / - Public entry point
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Placeholder shown while the provider is still resolving the session.
/// Reloads itself until the guard decides otherwise.
pub fn loading() -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(LOADING_PAGE),
    )
        .into_response()
}

/// GET /protected - Document overview
pub async fn overview(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Response {
    let Some(user) = state.provider.current_user(&session).await else {
        // Session ended between the guard and here.
        return Redirect::to(PUBLIC_ENTRY).into_response();
    };

    Html(render_overview(user.label())).into_response()
}

fn render_overview(user_label: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Knowledge Base</title></head>
<body>
  <p>Signed in as {user}</p>
  <button id="print-token" type="button">Print Access Token</button>
  <form method="post" action="/logout"><button type="submit">Logout</button></form>
  <script>
    document.getElementById("print-token").addEventListener("click", async () => {{
      const response = await fetch("/protected/token", {{ method: "POST" }});
      const body = await response.json();
      console.log(response.ok ? body.access_token : body);
    }});
  </script>
</body>
</html>
"#,
        user = html_escape::encode_text(user_label)
    )
}
