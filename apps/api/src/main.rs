mod checkin;
mod config;
mod errors;
mod guidance;
mod llm_client;
mod profile;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::checkin::session::CheckInSession;
use crate::config::Config;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::GeminiClient;
use crate::profile::store::JsonFileStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Saanvi API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Gemini client
    let model = GeminiClient::new(config.gemini_api_key.clone())?;
    info!("Gemini client initialized (model: {})", llm_client::MODEL);

    // Initialize profile storage
    let store = JsonFileStore::new(&config.data_dir);
    info!("Profile store at {}", store.path().display());

    let retry_policy = RetryPolicy::new(
        config.max_attempts,
        Duration::from_millis(config.backoff_base_ms),
    );
    info!(
        "Guidance retries: {} attempts, {}ms base backoff",
        config.max_attempts, config.backoff_base_ms
    );

    // Build app state
    let state = AppState {
        model: Arc::new(model),
        store: Arc::new(store),
        session: Arc::new(CheckInSession::new()),
        retry_policy,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
