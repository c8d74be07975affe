use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    pub lang: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub gemini: GeminiConfig,
    pub speech: SpeechConfig,
    pub upload_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            issuer: env_or("SESSION_ISSUER", "studynotes"),
            audience: env_or("SESSION_AUDIENCE", "studynotes-web"),
            ttl_minutes: parse_or(std::env::var("SESSION_TTL_MINUTES").ok(), 60 * 12),
            cookie_secure: parse_or(std::env::var("SESSION_COOKIE_SECURE").ok(), false),
        };
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?,
            model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
            endpoint: env_or(
                "GEMINI_ENDPOINT",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
        };
        let speech = SpeechConfig {
            lang: env_or("TTS_LANG", "en"),
            endpoint: env_or("TTS_ENDPOINT", "https://translate.google.com/translate_tts"),
        };
        let max_upload_mb: usize = parse_or(std::env::var("MAX_UPLOAD_MB").ok(), 20);

        Ok(Self {
            database_url,
            session,
            gemini,
            speech,
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            audio_dir: PathBuf::from(env_or("AUDIO_DIR", "static/audio")),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

/// Parses an optional raw value, falling back to `default` when absent or malformed.
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
