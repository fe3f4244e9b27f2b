use anyhow::{Context, Result};

use crate::llm_client::retry::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub data_dir: String,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            max_attempts: parse_env("GUIDANCE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            backoff_base_ms: parse_env("GUIDANCE_BACKOFF_MS", DEFAULT_BASE_DELAY_MS)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
