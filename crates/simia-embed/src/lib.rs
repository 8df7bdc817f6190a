// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama-backed embedding provider for the Simia paper-chat backend.
//!
//! Implements [`EmbeddingProvider`] over the Ollama `/api/embed`
//! endpoint. Query texts are embedded one at a time; the corpus side is
//! embedded offline, so the only runtime traffic here is user queries.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use simia_config::EmbeddingConfig;
use simia_core::traits::EmbeddingProvider;
use simia_core::SimiaError;

use crate::types::{ApiErrorResponse, EmbedRequest, EmbedResponse};

/// Embedding provider backed by a local Ollama server.
///
/// Every failure maps to [`SimiaError::RetrievalUnavailable`] so upstream
/// layers treat an unreachable embedder the same as a malformed response:
/// retrieval is off the table for this request, nothing is cached.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OllamaEmbedder {
    /// Creates a new embedder from the given configuration.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, SimiaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SimiaError::RetrievalUnavailable {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        info!(
            model = config.model,
            base_url = config.base_url,
            "embedding provider initialized"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SimiaError> {
        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: self.model.clone(),
            input: vec![text.to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SimiaError::RetrievalUnavailable {
                message: format!("embedding request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "embedding response received");

        if !status.is_success() {
            return Err(api_error(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| SimiaError::RetrievalUnavailable {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })?;
        let parsed: EmbedResponse =
            serde_json::from_str(&body).map_err(|e| SimiaError::RetrievalUnavailable {
                message: format!("failed to parse embedding response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let vector = parsed
            .embeddings
            .into_iter()
            .next()
            .or(parsed.embedding)
            .ok_or_else(|| SimiaError::RetrievalUnavailable {
                message: "embedding service returned no vectors".into(),
                source: None,
            })?;

        if vector.len() != self.dimension {
            return Err(SimiaError::RetrievalUnavailable {
                message: format!(
                    "embedding dimension mismatch: expected {}, got {}",
                    self.dimension,
                    vector.len()
                ),
                source: None,
            });
        }

        Ok(vector)
    }
}

/// Reads an error response body and formats the service error detail.
async fn api_error(status: reqwest::StatusCode, response: reqwest::Response) -> SimiaError {
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_err) => format!("embedding service error ({status}): {}", api_err.error),
        Err(_) => format!("embedding service returned {status}: {body}"),
    };
    SimiaError::RetrievalUnavailable {
        message,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_embedder(base_url: &str, dimension: usize) -> OllamaEmbedder {
        let config = EmbeddingConfig {
            base_url: "http://unused.invalid".into(),
            model: "all-minilm".into(),
            dimension,
            timeout_secs: 5,
        };
        OllamaEmbedder::new(&config)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn embed_posts_model_and_input() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_partial_json(serde_json::json!({
                "model": "all-minilm",
                "input": ["gibbon song structure"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [[0.1, 0.2, 0.3]],
            })))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server.uri(), 3);
        let vector = embedder.embed("gibbon song structure").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn embed_accepts_legacy_single_vector_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": [0.4, 0.5],
            })))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server.uri(), 2);
        let vector = embedder.embed("chimpanzee tool use").await.unwrap();
        assert_eq!(vector, vec![0.4, 0.5]);
    }

    #[tokio::test]
    async fn embed_rejects_wrong_dimension() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [[0.1, 0.2]],
            })))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server.uri(), 384);
        let err = embedder.embed("lemur locomotion").await.unwrap_err();
        assert!(matches!(err, SimiaError::RetrievalUnavailable { .. }));
        assert!(err.to_string().contains("expected 384, got 2"));
    }

    #[tokio::test]
    async fn embed_maps_service_error_detail() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "model 'all-minilm' not found, try pulling it first",
            })))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server.uri(), 3);
        let err = embedder.embed("baboon hierarchy").await.unwrap_err();
        assert!(matches!(err, SimiaError::RetrievalUnavailable { .. }));
        assert!(err.to_string().contains("try pulling it first"));
    }

    #[tokio::test]
    async fn embed_with_no_vectors_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [],
            })))
            .mount(&server)
            .await;

        let embedder = test_embedder(&server.uri(), 3);
        let err = embedder.embed("orangutan nest building").await.unwrap_err();
        assert!(err.to_string().contains("no vectors"));
    }

    #[tokio::test]
    async fn provider_name_is_ollama() {
        let embedder = test_embedder("http://unused.invalid", 3);
        assert_eq!(embedder.name(), "ollama");
    }
}
