use std::collections::HashSet;

use anyhow::{Context, Result};

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL_NAME: &str = "llama-3.1-8b-instant";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub model_name: String,
    pub llm_timeout_secs: u64,
    /// Shared secret expected in the `X-Internal-API-Key` header.
    pub internal_api_key: String,
    pub max_file_size_mb: usize,
    /// Lowercase extensions without the dot, e.g. `pdf`.
    pub allowed_file_types: HashSet<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_api_url: optional_env("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            model_name: optional_env("MODEL_NAME", DEFAULT_MODEL_NAME),
            llm_timeout_secs: optional_env("LLM_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            internal_api_key: require_env("INTERNAL_API_KEY")?,
            max_file_size_mb: optional_env("MAX_FILE_SIZE_MB", "5")
                .parse::<usize>()
                .context("MAX_FILE_SIZE_MB must be a whole number")?,
            allowed_file_types: parse_file_types(&optional_env("ALLOWED_FILE_TYPES", "pdf,docx")),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `"PDF, docx,,"` → `{"pdf", "docx"}`
pub fn parse_file_types(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|item| item.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        groq_api_key: "test-groq-key".to_string(),
        groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
        model_name: DEFAULT_MODEL_NAME.to_string(),
        llm_timeout_secs: 5,
        internal_api_key: "test-internal-key".to_string(),
        max_file_size_mb: 1,
        allowed_file_types: parse_file_types("pdf,docx"),
        port: 0,
        rust_log: "debug".to_string(),
    }
}
