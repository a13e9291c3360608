use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// The model credential and admin secret are optional: the server starts
/// without them and the affected endpoints report the missing state instead.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial Gemini API key. Empty means unset until an admin supplies one.
    pub gemini_api_key: String,
    /// Initial preferred model identifier.
    pub gemini_model: String,
    /// Admin secret guarding the key-management endpoints. While empty those
    /// endpoints answer 503.
    pub admin_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| crate::llm_client::DEFAULT_MODEL.to_string()),
            admin_key: optional_env("API_ADMIN_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}
