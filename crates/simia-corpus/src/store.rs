// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable in-memory corpus tables with id lookups.

use std::collections::HashMap;

use crate::records::{Chunk, ChunkEmbedding, Paper, PaperEmbedding};

/// The loaded corpus: papers, chunks, and their embedding vectors.
///
/// Built once at startup and shared read-only behind an `Arc`; nothing
/// here mutates after construction.
#[derive(Debug, Default)]
pub struct CorpusStore {
    papers: Vec<Paper>,
    paper_index: HashMap<String, usize>,
    paper_embeddings: Vec<PaperEmbedding>,
    chunks: Vec<Chunk>,
    chunk_index: HashMap<String, usize>,
    chunk_embeddings: Vec<ChunkEmbedding>,
}

impl CorpusStore {
    pub fn new(
        papers: Vec<Paper>,
        paper_embeddings: Vec<PaperEmbedding>,
        chunks: Vec<Chunk>,
        chunk_embeddings: Vec<ChunkEmbedding>,
    ) -> Self {
        let paper_index = papers
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id.clone(), idx))
            .collect();
        let chunk_index = chunks
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.chunk_id.clone(), idx))
            .collect();
        Self {
            papers,
            paper_index,
            paper_embeddings,
            chunks,
            chunk_index,
            chunk_embeddings,
        }
    }

    /// An empty store, used when no corpus files are present.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn paper(&self, id: &str) -> Option<&Paper> {
        self.paper_index.get(id).map(|&idx| &self.papers[idx])
    }

    pub fn chunk(&self, chunk_id: &str) -> Option<&Chunk> {
        self.chunk_index.get(chunk_id).map(|&idx| &self.chunks[idx])
    }

    /// All papers in corpus order.
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn paper_embeddings(&self) -> &[PaperEmbedding] {
        &self.paper_embeddings
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk_embeddings(&self) -> &[ChunkEmbedding] {
        &self.chunk_embeddings
    }

    pub fn paper_count(&self) -> usize {
        self.papers.len()
    }

    pub fn paper_embedding_count(&self) -> usize {
        self.paper_embeddings.len()
    }

    /// Whether a usable chunk-level index was loaded. When false, search
    /// degrades to paper-level retrieval.
    pub fn has_chunk_index(&self) -> bool {
        !self.chunk_embeddings.is_empty()
    }
}
