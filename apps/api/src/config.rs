use anyhow::{Context, Result};

use crate::profile::SkillVocabulary;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub skill_vocabulary: SkillVocabulary,
    /// Base URL of an NLP sidecar. `None` selects the in-process rule recognizer.
    pub ner_endpoint: Option<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            skill_vocabulary: skill_vocabulary(optional_env("SKILL_KEYWORDS").as_deref()),
            ner_endpoint: optional_env("NER_ENDPOINT"),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            skill_vocabulary: SkillVocabulary::default(),
            ner_endpoint: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Blank or unset values are treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A configured list that normalizes to nothing falls back to the defaults.
fn skill_vocabulary(raw: Option<&str>) -> SkillVocabulary {
    match raw.map(SkillVocabulary::from_csv) {
        Some(vocabulary) if !vocabulary.is_empty() => vocabulary,
        _ => SkillVocabulary::default(),
    }
}
