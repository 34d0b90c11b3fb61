use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingKey(&'static str),
}

/// Everything a scan needs, resolved once at startup. Credentials come from
/// the environment, endpoints from optional env overrides, paths and
/// tunables from the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    pub ocr_api_key: String,
    pub gemini_api_key: String,
    pub ocr_endpoint: String,
    pub gemini_endpoint: String,
    pub language: String,
    pub model: String,
    pub image_path: PathBuf,
    pub resized_path: PathBuf,
}

impl Config {
    /// Resolve configuration. Fails when a credential is absent, before any
    /// filesystem or network activity.
    pub fn from_env(
        image_path: PathBuf,
        resized_path: PathBuf,
        language: String,
        model: String,
    ) -> Result<Self, ConfigError> {
        let ocr_api_key = require("OCR_API_KEY")?;
        let gemini_api_key = require("GEMINI_API_KEY")?;

        Ok(Self {
            ocr_api_key,
            gemini_api_key,
            ocr_endpoint: std::env::var("MAKBUZ_OCR_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_OCR_ENDPOINT.to_string()),
            gemini_endpoint: std::env::var("MAKBUZ_GEMINI_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GEMINI_ENDPOINT.to_string()),
            language,
            model,
            image_path,
            resized_path,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingKey(name)),
    }
}
