//! Axum route handlers for the Credential API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

/// The key itself is never echoed back.
#[derive(Debug, Serialize)]
pub struct CredentialStatusResponse {
    pub configured: bool,
}

/// GET /api/v1/credential
pub async fn handle_credential_status(
    State(state): State<AppState>,
) -> Json<CredentialStatusResponse> {
    Json(CredentialStatusResponse {
        configured: state.credentials.is_configured().await,
    })
}

/// PUT /api/v1/credential
///
/// A blank `api_key` clears the stored credential.
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Json(request): Json<SetCredentialRequest>,
) -> Result<StatusCode, AppError> {
    state.credentials.set(&request.api_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/credential
pub async fn handle_clear_credential(
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.credentials.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
