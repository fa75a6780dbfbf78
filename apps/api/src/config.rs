use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: String,
    pub deepseek_api_url: String,
    pub deepseek_model: String,
    pub port: u16,
    pub rust_log: String,
    pub listings_path: PathBuf,
    /// Résumés longer than this are truncated before being stored.
    pub max_resume_chars: usize,
    pub max_body_bytes: usize,
    pub llm_timeout_secs: u64,
    /// Sessions untouched for this long are evicted. 0 disables eviction.
    pub session_idle_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            deepseek_api_key: require_env("DEEPSEEK_API_KEY")?,
            deepseek_api_url: std::env::var("DEEPSEEK_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            deepseek_model: std::env::var("DEEPSEEK_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: parse_env("PORT", 3001)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            listings_path: std::env::var("LISTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/listings.csv")),
            max_resume_chars: parse_env("MAX_RESUME_CHARS", 20_000)?,
            max_body_bytes: parse_env("MAX_BODY_BYTES", 10 * 1024 * 1024)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            session_idle_minutes: parse_env("SESSION_IDLE_MINUTES", 120)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by handler tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            deepseek_api_key: "test-key".to_string(),
            deepseek_api_url: DEFAULT_API_URL.to_string(),
            deepseek_model: DEFAULT_MODEL.to_string(),
            port: 3001,
            rust_log: "debug".to_string(),
            listings_path: PathBuf::from("data/listings.csv"),
            max_resume_chars: 200,
            max_body_bytes: 1024 * 1024,
            llm_timeout_secs: 5,
            session_idle_minutes: 120,
        }
    }
}
