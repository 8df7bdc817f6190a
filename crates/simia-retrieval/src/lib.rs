// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic retrieval for the Simia paper-chat backend.
//!
//! Ranks papers and section chunks by cosine similarity against a
//! cached query embedding, classifies dataset-level meta-questions, and
//! renders ranked results into LLM context blocks.
//!
//! ## Architecture
//!
//! - **cache**: bounded LRU over normalized-query embedding vectors
//! - **engine**: linear-scan cosine ranking with per-paper diversity
//! - **classify**: lexical meta-question gate
//! - **context**: context-block rendering for ranked results

pub mod cache;
pub mod classify;
pub mod context;
pub mod engine;

pub use cache::{cache_key, EmbeddingCache};
pub use classify::{is_meta_question, META_KEYWORDS};
pub use context::{format_chunk_context, format_paper_context};
pub use engine::{
    cosine_similarity, RankedChunk, RankedPaper, RetrievalEngine, RetrievalParams,
};
