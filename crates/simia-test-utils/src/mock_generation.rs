// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation collaborator for deterministic testing.
//!
//! `MockGeneration` implements `GenerationProvider` with scripted
//! outcomes, enabling fast, CI-runnable tests without live API calls.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use simia_core::traits::GenerationProvider;
use simia_core::types::{GenerationChunk, GenerationRequest, GenerationResponse, TokenUsage};
use simia_core::SimiaError;

/// One scripted outcome for a mock generation call.
#[derive(Debug, Clone)]
pub enum MockScript {
    /// Succeed with the given text. Streamed as one text fragment
    /// followed by a finish chunk.
    Reply(String),
    /// Fail the call. Streamed as the given fragments followed by an
    /// error item; `complete` fails immediately.
    Fail {
        fragments: Vec<String>,
        message: String,
    },
}

/// A mock generation collaborator that replays scripted outcomes.
///
/// Scripts are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" text is returned. Every request is recorded
/// for later inspection.
pub struct MockGeneration {
    scripts: Arc<Mutex<VecDeque<MockScript>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGeneration {
    /// Create a new mock with an empty script queue.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock pre-loaded with successful replies.
    pub fn with_replies(texts: Vec<String>) -> Self {
        let scripts: VecDeque<MockScript> =
            texts.into_iter().map(MockScript::Reply).collect();
        Self {
            scripts: Arc::new(Mutex::new(scripts)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, text: impl Into<String>) {
        self.scripts
            .lock()
            .await
            .push_back(MockScript::Reply(text.into()));
    }

    /// Queue a failure with no preceding fragments.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.scripts.lock().await.push_back(MockScript::Fail {
            fragments: Vec::new(),
            message: message.into(),
        });
    }

    /// Queue an arbitrary script.
    pub async fn push(&self, script: MockScript) {
        self.scripts.lock().await.push_back(script);
    }

    /// All requests the mock has received, in call order.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_script(&self) -> MockScript {
        self.scripts
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockScript::Reply("mock response".to_string()))
    }

    fn mock_usage() -> TokenUsage {
        TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        }
    }
}

impl Default for MockGeneration {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationProvider for MockGeneration {
    fn name(&self) -> &str {
        "mock-generation"
    }

    async fn complete(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, SimiaError> {
        self.requests.lock().await.push(request);
        match self.next_script().await {
            MockScript::Reply(text) => Ok(GenerationResponse {
                text,
                model: "mock-generation".to_string(),
                usage: Some(Self::mock_usage()),
            }),
            MockScript::Fail { message, .. } => Err(SimiaError::Generation {
                message,
                source: None,
            }),
        }
    }

    async fn stream(
        &self,
        request: GenerationRequest,
    ) -> Result<
        Pin<Box<dyn futures_core::Stream<Item = Result<GenerationChunk, SimiaError>> + Send>>,
        SimiaError,
    > {
        self.requests.lock().await.push(request);

        let items: Vec<Result<GenerationChunk, SimiaError>> = match self.next_script().await {
            MockScript::Reply(text) => vec![
                Ok(GenerationChunk {
                    text: Some(text),
                    ..GenerationChunk::default()
                }),
                Ok(GenerationChunk {
                    finish_reason: Some("STOP".to_string()),
                    usage: Some(Self::mock_usage()),
                    ..GenerationChunk::default()
                }),
            ],
            MockScript::Fail { fragments, message } => {
                let mut items: Vec<Result<GenerationChunk, SimiaError>> = fragments
                    .into_iter()
                    .map(|text| {
                        Ok(GenerationChunk {
                            text: Some(text),
                            ..GenerationChunk::default()
                        })
                    })
                    .collect();
                items.push(Err(SimiaError::Generation {
                    message,
                    source: None,
                }));
                items
            }
        };

        Ok(Box::pin(stream::iter(items)))
    }
}
