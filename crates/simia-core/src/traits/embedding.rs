// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding collaborator trait.

use async_trait::async_trait;

use crate::error::SimiaError;

/// Opaque text-to-vector collaborator.
///
/// Implementations must return vectors matching the corpus dimension
/// ([`crate::types::EMBEDDING_DIM`]); failures propagate as
/// [`SimiaError::RetrievalUnavailable`] and are never cached.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Generates the embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SimiaError>;
}
