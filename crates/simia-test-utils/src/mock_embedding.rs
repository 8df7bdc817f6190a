// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding collaborator for deterministic testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use simia_core::traits::EmbeddingProvider;
use simia_core::SimiaError;

/// A mock embedding collaborator with a fixed default vector, optional
/// per-text overrides, and a call counter.
///
/// The counter makes cache behavior observable: a cached lookup must not
/// increment it.
pub struct MockEmbedding {
    default_vector: Vec<f32>,
    overrides: HashMap<String, Vec<f32>>,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockEmbedding {
    /// Return the given vector for every text.
    pub fn returning(vector: Vec<f32>) -> Self {
        Self {
            default_vector: vector,
            overrides: HashMap::new(),
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with a retrieval-unavailable error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_vector: Vec::new(),
            overrides: HashMap::new(),
            fail_with: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Return a specific vector for an exact input text.
    pub fn with_override(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.overrides.insert(text.into(), vector);
        self
    }

    /// Number of `embed` calls the mock has received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedding {
    fn name(&self) -> &str {
        "mock-embedding"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SimiaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.fail_with {
            return Err(SimiaError::RetrievalUnavailable {
                message: message.clone(),
                source: None,
            });
        }

        Ok(self
            .overrides
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default_vector.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_default_vector_and_counts_calls() {
        let mock = MockEmbedding::returning(vec![1.0, 0.0]);
        assert_eq!(mock.embed("anything").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(mock.embed("else").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn override_takes_precedence_for_exact_text() {
        let mock = MockEmbedding::returning(vec![0.0, 1.0])
            .with_override("macaque faces", vec![1.0, 0.0]);
        assert_eq!(
            mock.embed("macaque faces").await.unwrap(),
            vec![1.0, 0.0]
        );
        assert_eq!(mock.embed("other").await.unwrap(), vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn failing_mock_returns_retrieval_unavailable() {
        let mock = MockEmbedding::failing("model offline");
        let err = mock.embed("query").await.unwrap_err();
        assert!(matches!(err, SimiaError::RetrievalUnavailable { .. }));
        assert_eq!(mock.call_count(), 1);
    }
}
