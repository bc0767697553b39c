/// LLM Client: the single point of entry for all Gemini calls in the companion.
///
/// No other module may call the generative-language API directly.
/// One request per call: no retries, no backoff. A failed call surfaces
/// immediately and the caller decides whether to resubmit.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from Gemini API: {0}")]
    InvalidEnvelope(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts `candidates[0].content.parts[0].text`.
    ///
    /// A missing candidate, content, part or text is a hard error: the
    /// envelope itself is broken, as opposed to the text inside it.
    pub fn into_text(self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .ok_or_else(|| LlmError::InvalidEnvelope("no candidates".to_string()))?;

        let content = candidate.content.ok_or_else(|| {
            LlmError::InvalidEnvelope("first candidate has no content".to_string())
        })?;

        content
            .parts
            .into_iter()
            .next()
            .and_then(|part| part.text)
            .ok_or_else(|| LlmError::InvalidEnvelope("first content part has no text".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Thin wrapper over the Gemini `generateContent` endpoint.
/// The API key is supplied per call and travels only as the `key` query parameter.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_url: String,
}

impl GeminiClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends `prompt` as a single content part and returns the raw reply text.
    pub async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        // reqwest errors carry the request URL, which includes the key
        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;

        if !status.is_success() {
            warn!("Gemini API returned {}", status);
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string()
                });
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = envelope.into_text()?;

        debug!("Gemini call succeeded: reply_chars={}", text.chars().count());

        Ok(text)
    }
}
