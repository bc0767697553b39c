mod analysis;
mod config;
mod credentials;
mod errors;
mod llm_client;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::{
    CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore,
};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Companion API v{}", env!("CARGO_PKG_VERSION"));

    // Load the API credential once; every later change writes through
    let store: Arc<dyn CredentialStore> = match &config.credential_store_path {
        Some(path) => {
            let store = FileCredentialStore::new(path.clone());
            info!("Credential store: {}", store.path().display());
            Arc::new(store)
        }
        None => {
            warn!("CREDENTIAL_STORE_PATH is empty; the API key will not survive a restart");
            Arc::new(MemoryCredentialStore::default())
        }
    };
    let credentials = Credentials::load(store).await?;
    if let Some(seed) = &config.gemini_api_key {
        if !credentials.is_configured().await {
            credentials.set(seed).await?;
            info!("Credential store seeded from GEMINI_API_KEY");
        }
    }

    let llm = GeminiClient::new(
        config.gemini_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    info!("Gemini client initialized (endpoint: {})", llm.api_url());

    let state = AppState::new(llm, credentials);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
