//! Axum route handlers for the Analysis API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::models::{CareerAnalysis, CAREER_PATHS};
use crate::analysis::normalizer::{normalize, NormalizationPhase};
use crate::analysis::report::{
    parse_report, render_report, render_summary, report_filename, ParsedReport,
};
use crate::analysis::service::analyze_career;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CareerPathsResponse {
    pub career_paths: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume: String,
    pub career_path: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub career_path: String,
    pub generated_at: DateTime<Utc>,
    pub phase: NormalizationPhase,
    pub report_filename: String,
    pub analysis: CareerAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub raw_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub analysis: CareerAnalysis,
    pub career_path: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub analysis: CareerAnalysis,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/career-paths
pub async fn handle_list_career_paths() -> Json<CareerPathsResponse> {
    Json(CareerPathsResponse {
        career_paths: CAREER_PATHS.to_vec(),
    })
}

/// POST /api/v1/analysis
///
/// Runs one analysis against Gemini. Rejected with 409 while another
/// analysis is still in flight.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let _permit = state.analysis_slot.try_acquire().map_err(|_| {
        AppError::Conflict("An analysis is already in progress".to_string())
    })?;

    let outcome = analyze_career(
        &state.llm,
        &state.credentials,
        &request.resume,
        &request.career_path,
    )
    .await?;

    Ok(Json(AnalyzeResponse {
        analysis_id: outcome.analysis_id,
        report_filename: report_filename(&outcome.career_path),
        career_path: outcome.career_path,
        generated_at: outcome.generated_at,
        phase: outcome.phase,
        analysis: outcome.analysis,
    }))
}

/// POST /api/v1/analysis/normalize
///
/// Normalizes a raw model reply without calling Gemini.
pub async fn handle_normalize(Json(request): Json<NormalizeRequest>) -> Json<CareerAnalysis> {
    Json(normalize(&request.raw_text))
}

/// POST /api/v1/analysis/report
///
/// Returns the plain-text report as a download.
pub async fn handle_report(Json(request): Json<ReportRequest>) -> Result<Response, AppError> {
    let career_path = request.career_path.trim();
    if career_path.is_empty() {
        return Err(AppError::Validation(
            "career_path cannot be empty".to_string(),
        ));
    }

    let body = render_report(&request.analysis, career_path);
    let disposition = attachment_disposition(&report_filename(career_path));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /api/v1/analysis/report/parse
///
/// Reads a downloaded report (sent as the raw request body) back into its sections.
pub async fn handle_parse_report(body: String) -> Result<Json<ParsedReport>, AppError> {
    parse_report(&body)
        .map(Json)
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// POST /api/v1/analysis/summary
pub async fn handle_summary(Json(request): Json<SummaryRequest>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        summary: render_summary(&request.analysis),
    })
}

/// Header values must be visible ASCII; anything else in the name becomes `_`.
fn attachment_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}
