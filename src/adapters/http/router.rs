//! Router assembly.
//!
//! ```text
//! /                  public   home page
//! /login             public   start login
//! /callback          public   finish login
//! /healthz           public   liveness
//! /protected         guarded  document overview
//! /protected/token   guarded  print access token
//! /logout            guarded  end session
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::domain::routing::PROTECTED;

use super::auth;
use super::middleware::route_guard;
use super::pages;
use super::state::AppState;

/// Application routes without transport layers.
pub fn app_router(state: AppState) -> Router {
    let guarded = Router::new()
        .route(PROTECTED, get(pages::overview))
        .route("/protected/token", post(auth::fetch_access_token))
        .route("/logout", post(auth::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), route_guard));

    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/healthz", get(healthz))
        .merge(guarded)
        .with_state(state)
}

/// Full application with request ids, tracing and a request timeout.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    app_router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

async fn healthz() -> &'static str {
    "ok"
}
