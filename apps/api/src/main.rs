mod analysis;
mod config;
mod document;
mod errors;
mod llm_client;
mod models;
mod presentation;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionBackend, GeminiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed values are fatal
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Smart ATS v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the completion backend, if a key is configured
    let llm: Option<Arc<dyn CompletionBackend>> = match &config.google_api_key {
        Some(key) => {
            let client = GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_api_base.clone(),
            )?;
            info!("Gemini client initialized (model: {})", client.model());
            Some(Arc::new(client) as Arc<dyn CompletionBackend>)
        }
        None => {
            error!("GOOGLE_API_KEY is not set; analyses are disabled until it is configured");
            None
        }
    };

    let state = AppState::new(config.clone(), llm);

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
