use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use knowledge_base::adapters::auth::{Auth0IdentityProvider, Auth0Settings};
use knowledge_base::adapters::http::middleware::CookieSettings;
use knowledge_base::adapters::http::{build, AppState};
use knowledge_base::config::AppConfig;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let settings = Auth0Settings::from_config(&config.auth, &config.server);
    let provider = Arc::new(Auth0IdentityProvider::new(settings)?);
    tracing::info!(domain = %config.auth.domain, "Auth0 provider initialized");
    provider.spawn_session_sweeper(SESSION_SWEEP_INTERVAL);

    let state = AppState::new(
        provider,
        CookieSettings::from_config(&config),
        config.server.logout_return_url(),
    );
    let app = build(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, public_url = %config.server.public_url, "knowledge-base listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins
/// over the configured level when set.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
