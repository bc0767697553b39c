pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::credentials::handlers as credential;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/career-paths",
            get(analysis::handle_list_career_paths),
        )
        // Credential API
        .route(
            "/api/v1/credential",
            get(credential::handle_credential_status)
                .put(credential::handle_set_credential)
                .delete(credential::handle_clear_credential),
        )
        // Analysis API
        .route("/api/v1/analysis", post(analysis::handle_analyze))
        .route(
            "/api/v1/analysis/normalize",
            post(analysis::handle_normalize),
        )
        .route("/api/v1/analysis/report", post(analysis::handle_report))
        .route(
            "/api/v1/analysis/report/parse",
            post(analysis::handle_parse_report),
        )
        .route("/api/v1/analysis/summary", post(analysis::handle_summary))
        .with_state(state)
}
