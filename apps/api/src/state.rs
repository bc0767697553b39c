use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::credentials::Credentials;
use crate::llm_client::GeminiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: GeminiClient,
    pub credentials: Credentials,
    /// Single permit: at most one analysis is in flight per process.
    pub analysis_slot: Arc<Semaphore>,
}

impl AppState {
    pub fn new(llm: GeminiClient, credentials: Credentials) -> Self {
        Self {
            llm,
            credentials,
            analysis_slot: Arc::new(Semaphore::new(1)),
        }
    }
}
