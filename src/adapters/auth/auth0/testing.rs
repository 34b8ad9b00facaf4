//! Local stand-in for an Auth0 tenant's token endpoint.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::{json, Value};

use crate::config::{AuthConfig, ServerConfig};

use super::settings::Auth0Settings;

#[derive(Default)]
struct TenantState {
    responses: Mutex<VecDeque<(StatusCode, Value)>>,
    requests: Mutex<Vec<HashMap<String, String>>>,
    delay: Mutex<Option<Duration>>,
}

/// Serves `/oauth/token` on an ephemeral port, answering queued responses
/// in order and recording every form it receives.
pub struct FakeTenant {
    pub base_url: String,
    state: Arc<TenantState>,
}

impl FakeTenant {
    pub async fn start() -> Self {
        let state = Arc::new(TenantState::default());
        let app = Router::new()
            .route("/oauth/token", post(token))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn respond(&self, status: StatusCode, body: Value) {
        self.state
            .responses
            .lock()
            .unwrap()
            .push_back((status, body));
    }

    /// Holds every token response back by `delay`.
    pub fn delay_responses(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn token(
    State(state): State<Arc<TenantState>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(form);
    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let next = state.responses.lock().unwrap().pop_front();
    match next {
        Some((status, body)) => (status, Json(body)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "no_response_queued"})),
        ),
    }
}

/// Settings for client `client-123` pointed at `tenant`.
pub fn test_settings(tenant: &FakeTenant) -> Auth0Settings {
    let auth = AuthConfig {
        domain: "knowledge-base.eu.auth0.com".to_string(),
        client_id: "client-123".to_string(),
        ..Default::default()
    };
    Auth0Settings::from_config(&auth, &ServerConfig::default()).with_base_url(&tenant.base_url)
}
