use crate::config::Config;
use crate::resume::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extractor, recognizer and skill vocabulary, built once at startup.
    pub parser: ResumeParser,
}
