// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response types for the Ollama embeddings API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/embed`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    /// Embedding model name.
    pub model: String,
    /// Texts to embed. One vector is returned per entry.
    pub input: Vec<String>,
}

/// Response body for `POST /api/embed`.
///
/// Current servers return `embeddings` (one row per input); older ones
/// return a single `embedding` row.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    #[serde(default)]
    pub embeddings: Vec<Vec<f32>>,

    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// Error response from the embedding service.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
