// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed records for the corpus files produced by the offline pipeline.
//!
//! The pipeline emits four JSON files: the paper table, paper-level
//! embeddings, section chunks, and chunk-level embeddings. Records here
//! deserialize those files with named optional fields; unknown keys are
//! tolerated, a missing `id` is not.

use serde::{Deserialize, Deserializer, Serialize};

/// One paper of the corpus. Immutable after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<u16>,
    #[serde(default)]
    pub authors: Option<String>,
    /// Comma-joined topic tags.
    #[serde(default)]
    pub topics: Option<String>,
    /// Comma-joined species tags.
    #[serde(default)]
    pub animal: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
}

impl Paper {
    /// Display title, preferring `title` over the scraper's `name`.
    pub fn display_title(&self) -> Option<&str> {
        non_empty(self.title.as_deref()).or_else(|| non_empty(self.name.as_deref()))
    }

    pub fn has_abstract(&self) -> bool {
        non_empty(self.abstract_text.as_deref()).is_some()
    }

    pub fn has_code(&self) -> bool {
        non_empty(self.code.as_deref()).is_some()
    }
}

/// A section-scoped excerpt of one paper's full text. Immutable after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub paper_id: String,
    /// Section label from the chunker's taxonomy (abstract, methods,
    /// results, ...). Carried as a string; unknown labels are tolerated.
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub char_count: Option<usize>,
    /// Denormalized paper metadata snapshot for presentation without a join.
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

/// Paper metadata snapshot carried on every chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<u16>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub animal: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `embeddings.json`: paper-level embedding vectors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperEmbeddingsFile {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub papers: Vec<PaperEmbedding>,
}

/// One paper-level embedding, identified by the owning paper's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperEmbedding {
    pub id: String,
    pub embedding: Vec<f32>,
}

/// `chunks.json`: the chunk table plus summary counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunksFile {
    #[serde(default)]
    pub total_chunks: Option<usize>,
    #[serde(default)]
    pub total_papers: Option<usize>,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

/// `chunk_embeddings.json`: chunk-level embedding vectors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkEmbeddingsFile {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub total_embeddings: Option<usize>,
    #[serde(default)]
    pub embeddings: Vec<ChunkEmbedding>,
}

/// One chunk-level embedding, carrying the owning paper id so diversity
/// capping does not need a chunk-table join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkEmbedding {
    pub chunk_id: String,
    pub paper_id: String,
    pub embedding: Vec<f32>,
}

/// Treats empty and whitespace-only strings as absent, matching the
/// pipeline's habit of writing `""` for unknown fields.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Year fields arrive as integers from the scraper but as strings (often
/// empty) in chunk metadata; accept both, dropping anything unparsable.
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|y| u16::try_from(y).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u16>().ok(),
        _ => None,
    })
}
