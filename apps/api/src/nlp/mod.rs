//! Entity recognition — pluggable, trait-based backends producing labeled spans and tokens.
//!
//! Default: `RuleRecognizer` (in-process, deterministic, regex + gazetteer).
//! Optional: `RemoteRecognizer` (HTTP NLP sidecar, selected via `NER_ENDPOINT`).
//!
//! `AppState` holds an `Arc<dyn EntityRecognizer>`, constructed once at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod remote;
pub mod rules;

pub use remote::RemoteRecognizer;
pub use rules::RuleRecognizer;

// ────────────────────────────────────────────────────────────────────────────
// Span and token types (shared across all recognizer backends)
// ────────────────────────────────────────────────────────────────────────────

/// Entity class attached to a span. The vocabulary is open: anything that is
/// not a person, organization or email is carried verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Person,
    Organization,
    Email,
    Other(String),
}

impl EntityLabel {
    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Organization => "ORG",
            EntityLabel::Email => "EMAIL",
            EntityLabel::Other(label) => label,
        }
    }
}

impl From<&str> for EntityLabel {
    fn from(label: &str) -> Self {
        match label {
            "PERSON" => EntityLabel::Person,
            "ORG" => EntityLabel::Organization,
            "EMAIL" => EntityLabel::Email,
            other => EntityLabel::Other(other.to_string()),
        }
    }
}

impl From<String> for EntityLabel {
    fn from(label: String) -> Self {
        EntityLabel::from(label.as_str())
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

/// A labeled substring of the extracted text. `start`/`end` are byte offsets;
/// the profile builder only relies on encounter order, never on position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: impl Into<EntityLabel>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            label: label.into(),
            start: 0,
            end,
        }
    }
}

/// An atomic word or punctuation unit, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(default)]
    pub offset: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Recognizer API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Recognizer unavailable after {retries} attempts")]
    Unavailable { retries: u32 },
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Recognizer capability consumed by the profile pipeline.
///
/// Entity recognition and tokenization are separate methods so a backend is
/// never forced to produce both from a single call. Both must return results
/// in a stable order for identical input.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn entities(&self, text: &str) -> Result<Vec<EntitySpan>, RecognizerError>;

    async fn tokens(&self, text: &str) -> Result<Vec<Token>, RecognizerError>;

    /// Short backend name for logs ("rules" | "remote").
    fn backend(&self) -> &'static str;
}
