/// Remote recognizer — HTTP client for an NLP sidecar (spaCy-style JSON API).
///
/// Endpoints, relative to the configured base URL:
/// - `GET  /health`   — must answer 2xx at startup, otherwise the service refuses to boot
/// - `POST /entities` — `{"text"}` → `{"entities": [{"text", "label", "start", "end"}]}`
/// - `POST /tokens`   — `{"text"}` → `{"tokens": [{"text", "offset"}]}`
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::nlp::{EntityRecognizer, EntitySpan, RecognizerError, Token};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const BACKOFF_BASE: Duration = Duration::from_secs(1);

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    entities: Vec<EntitySpan>,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    tokens: Vec<Token>,
}

#[derive(Debug, Deserialize)]
struct SidecarError {
    error: String,
}

#[derive(Clone)]
pub struct RemoteRecognizer {
    client: Client,
    endpoint: String,
    backoff_base: Duration,
}

impl RemoteRecognizer {
    pub fn new(endpoint: &str) -> Result<Self, RecognizerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            backoff_base: BACKOFF_BASE,
        })
    }

    /// Builds the client and verifies the sidecar answers its health check.
    /// A recognizer that is not reachable at startup is fatal for the process.
    pub async fn connect(endpoint: &str) -> Result<Self, RecognizerError> {
        let recognizer = Self::new(endpoint)?;
        let response = recognizer
            .client
            .get(recognizer.url("health"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!("Remote recognizer reachable at {}", recognizer.endpoint);
        Ok(recognizer)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    /// POSTs `{"text": ...}` and deserializes the JSON reply.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn post_text<T: DeserializeOwned>(
        &self,
        path: &str,
        text: &str,
    ) -> Result<T, RecognizerError> {
        let url = self.url(path);
        let body = TextRequest { text };
        let mut last_error: Option<RecognizerError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff_delay(self.backoff_base, attempt);
                warn!(
                    "Recognizer call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(RecognizerError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Recognizer returned {}: {}", status, body);
                last_error = Some(RecognizerError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<SidecarError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(RecognizerError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!(
                "Recognizer call to /{path} succeeded ({} chars)",
                text.chars().count()
            );
            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or(RecognizerError::Unavailable {
            retries: MAX_RETRIES,
        }))
    }
}

/// Exponential backoff before retry `attempt` (1-based): base, 2×base, 4×base, ...
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * (1 << (attempt - 1))
}

#[async_trait]
impl EntityRecognizer for RemoteRecognizer {
    async fn entities(&self, text: &str) -> Result<Vec<EntitySpan>, RecognizerError> {
        let response: EntitiesResponse = self.post_text("entities", text).await?;
        Ok(response.entities)
    }

    async fn tokens(&self, text: &str) -> Result<Vec<Token>, RecognizerError> {
        let response: TokensResponse = self.post_text("tokens", text).await?;
        Ok(response.tokens)
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Router};

    use crate::nlp::EntityLabel;

    const ENTITIES_JSON: &str = r#"{"entities": [{"text": "Acme Corp", "label": "ORG"}]}"#;

    type Hits = Arc<AtomicUsize>;

    /// Serves `router` on an ephemeral localhost port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn sidecar(handler_router: Router<Hits>) -> (String, Hits) {
        let hits: Hits = Arc::new(AtomicUsize::new(0));
        let url = serve(handler_router.with_state(hits.clone())).await;
        (url, hits)
    }

    fn fast_recognizer(url: &str) -> RemoteRecognizer {
        RemoteRecognizer {
            backoff_base: Duration::from_millis(5),
            ..RemoteRecognizer::new(url).unwrap()
        }
    }

    async fn unavailable_once(State(hits): State<Hits>) -> (StatusCode, String) {
        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
            (StatusCode::SERVICE_UNAVAILABLE, "model loading".to_string())
        } else {
            (StatusCode::OK, ENTITIES_JSON.to_string())
        }
    }

    async fn always_unavailable(State(hits): State<Hits>) -> (StatusCode, String) {
        hits.fetch_add(1, Ordering::SeqCst);
        (StatusCode::SERVICE_UNAVAILABLE, "model loading".to_string())
    }

    async fn rate_limited_once(State(hits): State<Hits>) -> (StatusCode, String) {
        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
            (StatusCode::TOO_MANY_REQUESTS, "slow down".to_string())
        } else {
            (StatusCode::OK, r#"{"tokens": [{"text": "SQL", "offset": 0}]}"#.to_string())
        }
    }

    async fn bad_request(State(hits): State<Hits>) -> (StatusCode, String) {
        hits.fetch_add(1, Ordering::SeqCst);
        (StatusCode::BAD_REQUEST, r#"{"error": "bad"}"#.to_string())
    }

    #[tokio::test]
    async fn test_retries_after_server_error_then_succeeds() {
        let (url, hits) = sidecar(Router::new().route("/entities", post(unavailable_once))).await;

        let entities = fast_recognizer(&url).entities("Acme Corp").await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(entities, vec![EntitySpan {
            text: "Acme Corp".to_string(),
            label: EntityLabel::Organization,
            start: 0,
            end: 0,
        }]);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (url, hits) = sidecar(Router::new().route("/entities", post(always_unavailable))).await;

        let err = fast_recognizer(&url).entities("text").await.unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), MAX_RETRIES as usize);
        match err {
            RecognizerError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model loading");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_retries_on_rate_limit() {
        let (url, hits) = sidecar(Router::new().route("/tokens", post(rate_limited_once))).await;

        let tokens = fast_recognizer(&url).tokens("SQL").await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(tokens, vec![Token::new("SQL", 0)]);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried_and_surfaces_message() {
        let (url, hits) = sidecar(Router::new().route("/entities", post(bad_request))).await;

        let err = fast_recognizer(&url).entities("text").await.unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        match err {
            RecognizerError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_backoff_is_one_then_two_seconds() {
        let recognizer = RemoteRecognizer::new("http://localhost:8001").unwrap();
        assert_eq!(backoff_delay(recognizer.backoff_base, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(recognizer.backoff_base, 2), Duration::from_secs(2));
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let recognizer = RemoteRecognizer::new("http://localhost:8001/").unwrap();
        assert_eq!(recognizer.url("entities"), "http://localhost:8001/entities");
    }

    #[test]
    fn test_entities_response_keeps_engine_order() {
        let json = r#"{"entities": [
            {"text": "Jane Doe", "label": "PERSON", "start": 0, "end": 8},
            {"text": "Acme", "label": "ORG", "start": 20, "end": 24},
            {"text": "Berlin", "label": "GPE", "start": 30, "end": 36}
        ]}"#;
        let response: EntitiesResponse = serde_json::from_str(json).unwrap();
        let labels: Vec<EntityLabel> = response.entities.into_iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                EntityLabel::Person,
                EntityLabel::Organization,
                EntityLabel::Other("GPE".to_string())
            ]
        );
    }

    #[test]
    fn test_tokens_response_deserializes() {
        let json = r#"{"tokens": [{"text": "Python", "offset": 0}, {"text": ",", "offset": 6}]}"#;
        let response: TokensResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.tokens, vec![Token::new("Python", 0), Token::new(",", 6)]);
    }

    #[tokio::test]
    async fn test_connect_fails_when_sidecar_is_down() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let result = RemoteRecognizer::connect("http://127.0.0.1:9").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_backend_name() {
        let recognizer = RemoteRecognizer::new("http://localhost:8001").unwrap();
        assert_eq!(recognizer.backend(), "remote");
    }
}
