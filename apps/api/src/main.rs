mod config;
mod credentials;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::interview::knowledge::KnowledgeBase;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values, tolerates absent ones)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InterviewCoach API v{}", env!("CARGO_PKG_VERSION"));

    // Process-wide credential state, seeded from the environment. The key
    // value itself is never logged.
    let credentials = Arc::new(CredentialStore::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    info!(
        "Credential store initialized (key configured: {}, model: {})",
        credentials.has_key(),
        credentials.active_model()
    );

    // Static knowledge base, parsed once
    let knowledge = Arc::new(KnowledgeBase::builtin()?);
    info!("Knowledge base loaded ({} entries)", knowledge.len());

    // Chat backend (the only module that talks to the model API)
    let backend = Arc::new(GeminiClient::new());
    info!("Gemini client initialized");

    // Build app state
    let state = AppState {
        credentials,
        backend,
        knowledge,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
