//! Resume parsing pipeline: bytes → extracted text → entities + tokens → profile.
//!
//! Extraction is all-or-nothing: an unreadable document fails the request and
//! no profile is produced. Once text is available, building always succeeds.
//!
//! # spawn_blocking pattern
//! PDF parsing is CPU-bound and synchronous. It runs on the blocking pool with
//! owned inputs (`Bytes` + `Arc` extractor) so the async executor stays free.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{DocumentTextExtractor, ExtractedText};
use crate::nlp::EntityRecognizer;
use crate::profile::{Profile, ProfileBuilder};

/// Immutable, shareable pipeline. Holds no per-request state.
#[derive(Clone)]
pub struct ResumeParser {
    extractor: Arc<dyn DocumentTextExtractor>,
    recognizer: Arc<dyn EntityRecognizer>,
    builder: ProfileBuilder,
}

impl ResumeParser {
    pub fn new(
        extractor: Arc<dyn DocumentTextExtractor>,
        recognizer: Arc<dyn EntityRecognizer>,
        builder: ProfileBuilder,
    ) -> Self {
        Self {
            extractor,
            recognizer,
            builder,
        }
    }

    pub fn recognizer_backend(&self) -> &'static str {
        self.recognizer.backend()
    }

    /// Extracts document text on the blocking pool.
    pub async fn extract(&self, document: Bytes) -> Result<ExtractedText, AppError> {
        let extractor = Arc::clone(&self.extractor);
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&document))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
            })??;

        if !extracted.blank_pages().is_empty() {
            warn!(
                "{} of {} pages had no extractable text: {:?}",
                extracted.blank_pages().len(),
                extracted.page_count(),
                extracted.blank_pages()
            );
        }
        Ok(extracted)
    }

    /// Runs the full pipeline for one document.
    pub async fn parse(&self, document: Bytes) -> Result<Profile, AppError> {
        let extracted = self.extract(document).await?;
        let text = extracted.as_str();

        let entities = self.recognizer.entities(text).await?;
        let tokens = self.recognizer.tokens(text).await?;

        let profile = self.builder.build(text, entities, tokens);

        info!(
            "Parsed resume: {} pages, {} chars, {} organizations, {} skills (recognizer: {})",
            extracted.page_count(),
            text.chars().count(),
            profile.experience.len(),
            profile.skills.len(),
            self.recognizer.backend()
        );

        Ok(profile)
    }
}
