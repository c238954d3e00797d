mod config;
mod errors;
mod extraction;
mod nlp;
mod profile;
mod resume;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::PdfTextExtractor;
use crate::nlp::{EntityRecognizer, RemoteRecognizer, RuleRecognizer};
use crate::profile::ProfileBuilder;
use crate::resume::ResumeParser;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Recognizer is loaded once; an unreachable backend aborts startup.
    let recognizer = build_recognizer(&config).await?;
    info!("Entity recognizer initialized (backend: {})", recognizer.backend());

    let vocabulary = Arc::new(config.skill_vocabulary.clone());
    info!(
        "Skill vocabulary: {} keywords ({})",
        vocabulary.len(),
        vocabulary.keywords().join(", ")
    );

    let parser = ResumeParser::new(
        Arc::new(PdfTextExtractor),
        recognizer,
        ProfileBuilder::new(vocabulary),
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        parser,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Selects the recognizer backend: remote sidecar when `NER_ENDPOINT` is set, rules otherwise.
async fn build_recognizer(config: &Config) -> Result<Arc<dyn EntityRecognizer>> {
    match &config.ner_endpoint {
        Some(endpoint) => {
            let remote = RemoteRecognizer::connect(endpoint)
                .await
                .with_context(|| format!("Entity recognizer at '{endpoint}' is unavailable"))?;
            Ok(Arc::new(remote))
        }
        None => Ok(Arc::new(RuleRecognizer)),
    }
}
