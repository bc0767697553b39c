use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
const DEFAULT_CREDENTIAL_STORE_PATH: &str = ".career-companion/credentials.json";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_url: String,
    /// Seeds the credential store when it holds no key yet.
    pub gemini_api_key: Option<String>,
    /// `None` (empty `CREDENTIAL_STORE_PATH`) keeps the key in memory only.
    pub credential_store_path: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_url: env_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            credential_store_path: Some(env_or(
                "CREDENTIAL_STORE_PATH",
                DEFAULT_CREDENTIAL_STORE_PATH,
            ))
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
