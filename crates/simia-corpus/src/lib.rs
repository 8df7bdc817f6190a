// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paper corpus loading and in-memory indexing for the Simia backend.
//!
//! Reads the JSON artifacts produced by the offline indexing scripts
//! (paper metadata, paper embeddings, section chunks, chunk embeddings)
//! into a [`CorpusStore`] that the retrieval layer queries. Every file
//! is optional at startup; whatever is present determines which
//! retrieval modes are available.
//!
//! ## Architecture
//!
//! - **records**: serde models for the on-disk JSON artifacts
//! - **loader**: degradation-tolerant startup loading from a data dir
//! - **store**: indexed read-only view over the loaded records
//! - **stats**: corpus-wide counts rendered for meta-questions

pub mod loader;
pub mod records;
pub mod stats;
pub mod store;

pub use loader::load_corpus;
pub use records::{
    Chunk, ChunkEmbedding, ChunkEmbeddingsFile, ChunkMetadata, ChunksFile, Paper, PaperEmbedding,
    PaperEmbeddingsFile,
};
pub use stats::DatasetStats;
pub use store::CorpusStore;
