use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::session::DEFAULT_MAX_SESSIONS;

/// Application configuration loaded from environment variables.
///
/// The Gemini API key is optional: without it the page still renders and
/// extracts documents, but every analysis reports the missing credential.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub session_idle_timeout: Duration,
    pub max_sessions: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            google_api_key: optional_env("GOOGLE_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_api_base: optional_env("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),
            port: parse_env("PORT", defaults.port).context("PORT must be a valid port number")?,
            max_upload_bytes: parse_env::<usize>("MAX_UPLOAD_MB", 10)
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
                * 1024
                * 1024,
            session_idle_timeout: parse_env::<u64>("SESSION_IDLE_MINUTES", 120)
                .map(|minutes| Duration::from_secs(minutes * 60))
                .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
            max_sessions: parse_env("MAX_SESSIONS", defaults.max_sessions)
                .context("MAX_SESSIONS must be a whole number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            google_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            port: 8080,
            max_upload_bytes: 10 * 1024 * 1024,
            session_idle_timeout: Duration::from_secs(120 * 60),
            max_sessions: DEFAULT_MAX_SESSIONS,
            rust_log: "info".to_string(),
        }
    }
}

/// Blank values count as unset so `GOOGLE_API_KEY=` in a `.env` behaves like a missing key.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        None => Ok(default),
    }
}
