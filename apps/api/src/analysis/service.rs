//! Career analysis pipeline: validate → resolve credential → prompt → Gemini → normalize.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::models::CareerAnalysis;
use crate::analysis::normalizer::{normalize_with_phase, NormalizationPhase, Normalized};
use crate::analysis::prompts::build_career_prompt;
use crate::credentials::Credentials;
use crate::errors::AppError;
use crate::llm_client::GeminiClient;

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis_id: Uuid,
    pub career_path: String,
    pub generated_at: DateTime<Utc>,
    pub analysis: CareerAnalysis,
    pub phase: NormalizationPhase,
}

/// Runs one analysis. Errors are hard failures only: bad input, no
/// credential, or a transport/envelope failure. A malformed reply still
/// yields a fully populated result.
pub async fn analyze_career(
    llm: &GeminiClient,
    credentials: &Credentials,
    resume: &str,
    career_path: &str,
) -> Result<AnalysisOutcome, AppError> {
    let resume = resume.trim();
    if resume.is_empty() {
        return Err(AppError::Validation("resume cannot be empty".to_string()));
    }
    let career_path = career_path.trim();
    if career_path.is_empty() {
        return Err(AppError::Validation(
            "career_path cannot be empty".to_string(),
        ));
    }

    let api_key = credentials
        .current()
        .await
        .ok_or(AppError::MissingCredential)?;

    let analysis_id = Uuid::new_v4();
    info!("Starting career analysis {analysis_id} for '{career_path}'");

    let prompt = build_career_prompt(resume, career_path);
    let raw = llm.generate(&prompt, &api_key).await.map_err(|e| {
        warn!("Career analysis {analysis_id} failed: {e}");
        AppError::Llm(e)
    })?;

    let Normalized { analysis, phase } = normalize_with_phase(&raw);
    if phase == NormalizationPhase::Heuristic {
        warn!("Career analysis {analysis_id}: reply had no structured span, used section scanner");
    }
    info!("Career analysis {analysis_id} complete ({phase:?})");

    Ok(AnalysisOutcome {
        analysis_id,
        career_path: career_path.to_string(),
        generated_at: Utc::now(),
        analysis,
        phase,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::analysis::models::{FALLBACK_COURSES, FALLBACK_ROLES};
    use crate::credentials::MemoryCredentialStore;
    use crate::llm_client::LlmError;
    use crate::test_support::{gemini_reply, spawn_upstream, UpstreamReply};

    async fn credentials_with(key: Option<&str>) -> Credentials {
        let credentials = Credentials::load(Arc::new(MemoryCredentialStore::default()))
            .await
            .unwrap();
        if let Some(key) = key {
            credentials.set(key).await.unwrap();
        }
        credentials
    }

    fn client(url: &str) -> GeminiClient {
        GeminiClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_structured_reply_end_to_end() {
        let reply = r#"```json
{"roles": ["ML Engineer", "Data Scientist", "MLOps Engineer"],
 "skillGaps": ["PyTorch", "Model serving", "Statistics"],
 "courses": ["fast.ai", "Full Stack Deep Learning", "Stats 110"],
 "rewrittenResume": "Alex Kim\nML-focused engineer"}
```"#;
        let upstream = spawn_upstream(UpstreamReply::Ok(gemini_reply(reply))).await;
        let credentials = credentials_with(Some("AIza-key")).await;

        let outcome = analyze_career(
            &client(&upstream.url),
            &credentials,
            "  Alex Kim\nBackend engineer  \n",
            "Machine Learning Engineer",
        )
        .await
        .unwrap();

        assert_eq!(outcome.phase, NormalizationPhase::Structured);
        assert_eq!(outcome.career_path, "Machine Learning Engineer");
        assert_eq!(
            outcome.analysis.roles(),
            ["ML Engineer", "Data Scientist", "MLOps Engineer"]
        );
        assert_eq!(
            outcome.analysis.rewritten_resume(),
            "Alex Kim\nML-focused engineer"
        );

        let seen = upstream.last_request().await.unwrap();
        assert_eq!(seen.key.as_deref(), Some("AIza-key"));
        let prompt = seen.body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(prompt.ends_with("Resume:\nAlex Kim\nBackend engineer"));
        assert!(prompt.contains("\"Machine Learning Engineer\""));
    }

    #[tokio::test]
    async fn test_unstructured_reply_degrades_softly() {
        let reply = "Skills\n- Swift\n- Kotlin\n- App Store deployment\nResume\nSam Lee\nMobile developer";
        let upstream = spawn_upstream(UpstreamReply::Ok(gemini_reply(reply))).await;
        let credentials = credentials_with(Some("key")).await;

        let outcome = analyze_career(
            &client(&upstream.url),
            &credentials,
            "Sam Lee",
            "Mobile Developer",
        )
        .await
        .unwrap();

        assert_eq!(outcome.phase, NormalizationPhase::Heuristic);
        assert_eq!(
            outcome.analysis.skill_gaps(),
            ["Swift", "Kotlin", "App Store deployment"]
        );
        assert_eq!(outcome.analysis.roles(), FALLBACK_ROLES);
        assert_eq!(outcome.analysis.courses(), FALLBACK_COURSES);
        assert_eq!(
            outcome.analysis.rewritten_resume(),
            "Sam Lee\nMobile developer\n"
        );
    }

    #[tokio::test]
    async fn test_forbidden_is_a_hard_error() {
        let upstream = spawn_upstream(UpstreamReply::Status(
            StatusCode::FORBIDDEN,
            json!({"error": {"code": 403, "message": "API key not valid"}}),
        ))
        .await;
        let credentials = credentials_with(Some("bad-key")).await;

        let err = analyze_career(
            &client(&upstream.url),
            &credentials,
            "resume",
            "Cloud Engineer",
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Llm(LlmError::Api { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_credential_never_calls_upstream() {
        let upstream = spawn_upstream(UpstreamReply::Ok(gemini_reply("{}"))).await;
        let credentials = credentials_with(None).await;

        let err = analyze_career(
            &client(&upstream.url),
            &credentials,
            "resume",
            "Data Analyst",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::MissingCredential));
        assert_eq!(upstream.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected() {
        let upstream = spawn_upstream(UpstreamReply::Ok(gemini_reply("{}"))).await;
        let credentials = credentials_with(Some("key")).await;
        let llm = client(&upstream.url);

        let err = analyze_career(&llm, &credentials, "   \n", "Data Analyst")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = analyze_career(&llm, &credentials, "resume", " ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(upstream.request_count().await, 0);
    }
}
