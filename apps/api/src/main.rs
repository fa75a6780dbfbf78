mod config;
mod conversation;
mod errors;
mod listings;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::conversation::intent::KeywordClassifier;
use crate::conversation::sessions::{spawn_idle_sweeper, SessionStore};
use crate::listings::ListingStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobCoach API v{}", env!("CARGO_PKG_VERSION"));

    // Listings are optional: a missing file only degrades recommendations
    let listings = ListingStore::load(&config.listings_path);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.deepseek_api_key.clone(),
        config.deepseek_api_url.clone(),
        config.deepseek_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let classifier = KeywordClassifier::new()?;

    let sessions = Arc::new(SessionStore::new());
    spawn_idle_sweeper(Arc::clone(&sessions), config.session_idle_minutes);

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        classifier: Arc::new(classifier),
        sessions,
        listings,
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
