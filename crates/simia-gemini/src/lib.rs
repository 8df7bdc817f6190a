// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini generation provider for the Simia paper-chat backend.
//!
//! Implements [`GenerationProvider`] for the Gemini generateContent
//! API, providing both single-shot completion and streaming SSE
//! responses.

pub mod client;
pub mod sse;
pub mod types;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use tracing::info;

use simia_config::GeminiConfig;
use simia_core::traits::GenerationProvider;
use simia_core::types::{
    ChatRole, GenerationChunk, GenerationRequest, GenerationResponse, TokenUsage,
};
use simia_core::SimiaError;

use crate::client::GeminiClient;
use crate::types::{
    Content, GenerateRequest, GenerateResponse, GenerationConfig, Part, SystemInstruction,
};

/// Gemini provider implementing [`GenerationProvider`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
/// When no key resolves, the serving layer runs without a generation
/// collaborator and answers from the deterministic local fallback.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a new Gemini provider from the given configuration.
    pub fn new(config: &GeminiConfig) -> Result<Self, SimiaError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = config.model, "Gemini provider initialized");

        Ok(Self { client })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Converts a [`GenerationRequest`] to a Gemini [`GenerateRequest`].
    fn to_generate_request(&self, request: &GenerationRequest) -> GenerateRequest {
        let contents: Vec<Content> = request
            .messages
            .iter()
            .map(|turn| Content {
                role: match turn.role {
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "model".to_string(),
                },
                parts: vec![Part::text(turn.content.clone())],
            })
            .collect();

        GenerateRequest {
            contents,
            system_instruction: Some(SystemInstruction::from_text(
                request.system_prompt.clone(),
            )),
            generation_config: Some(GenerationConfig {
                max_output_tokens: request.max_output_tokens,
            }),
        }
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, SimiaError> {
        let api_request = self.to_generate_request(&request);
        let response = self.client.generate(&api_request).await?;

        if response.candidates.is_empty() {
            return Err(SimiaError::Generation {
                message: "Gemini returned no candidates".into(),
                source: None,
            });
        }

        let model = response
            .model_version
            .clone()
            .unwrap_or_else(|| self.client.model().to_string());

        Ok(GenerationResponse {
            text: response.text(),
            model,
            usage: response.usage_metadata.map(to_token_usage),
        })
    }

    async fn stream(
        &self,
        request: GenerationRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<GenerationChunk, SimiaError>> + Send>>, SimiaError>
    {
        let api_request = self.to_generate_request(&request);
        let response_stream = self.client.generate_stream(&api_request).await?;

        let chunk_stream = response_stream.map(|result| result.map(to_chunk));
        Ok(Box::pin(chunk_stream))
    }
}

/// Maps one streamed API response to a provider-neutral chunk.
fn to_chunk(response: GenerateResponse) -> GenerationChunk {
    let text = response.text();
    GenerationChunk {
        text: if text.is_empty() { None } else { Some(text) },
        finish_reason: response.finish_reason().map(str::to_string),
        usage: response.usage_metadata.map(to_token_usage),
    }
}

fn to_token_usage(usage: crate::types::UsageMetadata) -> TokenUsage {
    TokenUsage {
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, SimiaError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("GEMINI_API_KEY").map_err(|_| {
        SimiaError::Config(
            "Gemini API key not found. Set gemini.api_key in config or GEMINI_API_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use simia_core::types::ChatTurn;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_provider(base_url: &str) -> GeminiProvider {
        let client = GeminiClient::new(
            "test-api-key",
            "gemini-2.0-flash-lite".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url.to_string());
        GeminiProvider::with_client(client)
    }

    fn test_request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "You are a primatology assistant.".into(),
            messages: vec![
                ChatTurn::user("What do macaques recognize?"),
                ChatTurn::assistant("Faces, mostly."),
                ChatTurn::user("Cite a paper."),
            ],
            max_output_tokens: 512,
        }
    }

    #[test]
    fn resolve_api_key_from_config() {
        let result = resolve_api_key(&Some("test-key-123".into()));
        assert_eq!(result.unwrap(), "test-key-123");
    }

    #[test]
    fn resolve_api_key_missing_reports_both_sources() {
        if let Err(err) = resolve_api_key(&None) {
            let text = err.to_string();
            assert!(text.contains("gemini.api_key"), "got: {text}");
            assert!(text.contains("GEMINI_API_KEY"), "got: {text}");
        }
    }

    #[tokio::test]
    async fn request_conversion_maps_roles_and_config() {
        let provider = test_provider("http://unused.invalid");
        let api_req = provider.to_generate_request(&test_request());

        assert_eq!(api_req.contents.len(), 3);
        assert_eq!(api_req.contents[0].role, "user");
        assert_eq!(api_req.contents[1].role, "model");
        assert_eq!(api_req.contents[2].role, "user");
        assert_eq!(
            api_req.system_instruction.unwrap().parts[0].text,
            "You are a primatology assistant."
        );
        assert_eq!(api_req.generation_config.unwrap().max_output_tokens, 512);
    }

    #[tokio::test]
    async fn complete_extracts_text_and_usage() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "Macaques recognize familiar faces."}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 8},
            "modelVersion": "gemini-2.0-flash-lite-001"
        });

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash-lite:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.text, "Macaques recognize familiar faces.");
        assert_eq!(response.model, "gemini-2.0-flash-lite-001");
        assert_eq!(response.usage.unwrap().output_tokens, 8);
    }

    #[tokio::test]
    async fn complete_with_no_candidates_is_an_error() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "usageMetadata": {"promptTokenCount": 40}
        });

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[tokio::test]
    async fn stream_maps_responses_to_chunks() {
        let server = MockServer::start().await;

        let sse_body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Macaques \"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"recognize faces.\"}]}}]}\n\n",
            "data: {\"candidates\":[{\"finishReason\":\"STOP\"}],\"usageMetadata\":{\"promptTokenCount\":9,\"candidatesTokenCount\":4}}\n\n",
        );

        Mock::given(method("POST"))
            .and(path(
                "/v1beta/models/gemini-2.0-flash-lite:streamGenerateContent",
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let stream = provider.stream(test_request()).await.unwrap();

        let chunks: Vec<GenerationChunk> = stream
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text.as_deref(), Some("Macaques "));
        assert_eq!(chunks[1].text.as_deref(), Some("recognize faces."));
        assert_eq!(chunks[2].text, None);
        assert_eq!(chunks[2].finish_reason.as_deref(), Some("STOP"));
        assert_eq!(chunks[2].usage.as_ref().unwrap().output_tokens, 4);
    }

    #[tokio::test]
    async fn provider_name_is_gemini() {
        let provider = test_provider("http://unused.invalid");
        assert_eq!(provider.name(), "gemini");
    }
}
