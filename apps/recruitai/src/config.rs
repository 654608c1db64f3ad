use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "gemini/gemini-2.0-flash";
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Service configuration loaded from environment variables.
/// Only `PORT` and `MAX_CONTENT_LENGTH` can fail to parse; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent key is not a startup error; screening requests fail with a
    /// configuration message instead.
    pub ai_api_key: Option<String>,
    pub ai_model_name: String,
    pub upload_dir: PathBuf,
    pub max_content_length: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ai_api_key: optional_env("AI_API_KEY"),
            ai_model_name: optional_env("AI_MODEL_NAME")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            upload_dir: optional_env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_content_length: match optional_env("MAX_CONTENT_LENGTH") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_CONTENT_LENGTH must be a byte count")?,
                None => DEFAULT_MAX_CONTENT_LENGTH,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
