// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cosine-similarity retrieval over paper and chunk embeddings.
//!
//! The engine ranks the whole corpus per query (the index is small
//! enough that a linear scan beats any ANN structure), caches query
//! embeddings, and enforces per-paper diversity for chunk results.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use simia_core::traits::EmbeddingProvider;
use simia_core::SimiaError;
use simia_corpus::{Chunk, CorpusStore, Paper};

use crate::cache::{cache_key, EmbeddingCache};

/// Retrieval tuning knobs (mirrors `RetrievalConfig` from simia-config
/// to avoid a dependency on the config crate).
#[derive(Debug, Clone)]
pub struct RetrievalParams {
    /// Papers returned by paper-level search.
    pub paper_top_k: usize,
    /// Chunks returned by chunk-level search.
    pub chunk_top_k: usize,
    /// Diversity cap: accepted chunks per owning paper.
    pub max_per_paper: usize,
    /// Query embedding cache capacity.
    pub cache_capacity: usize,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            paper_top_k: 5,
            chunk_top_k: 6,
            max_per_paper: 2,
            cache_capacity: 100,
        }
    }
}

/// A paper with its similarity score for the current query.
#[derive(Debug, Clone)]
pub struct RankedPaper {
    pub paper: Paper,
    pub score: f32,
}

/// A chunk with its similarity score for the current query.
#[derive(Debug, Clone)]
pub struct RankedChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Retrieval engine over a loaded corpus.
pub struct RetrievalEngine {
    store: Arc<CorpusStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    cache: Mutex<EmbeddingCache>,
    params: RetrievalParams,
}

impl RetrievalEngine {
    pub fn new(
        store: Arc<CorpusStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        params: RetrievalParams,
    ) -> Self {
        let cache = Mutex::new(EmbeddingCache::new(params.cache_capacity));
        Self {
            store,
            embedder,
            cache,
            params,
        }
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// Chunk-level search is preferred whenever a chunk index is loaded.
    pub fn has_chunk_index(&self) -> bool {
        self.store.has_chunk_index()
    }

    /// Embed a query, consulting the cache first.
    ///
    /// Failures from the embedding collaborator propagate as
    /// [`SimiaError::RetrievalUnavailable`] and are never cached. The
    /// cache lock is released before the embedding call.
    pub async fn query_embedding(&self, query: &str) -> Result<Vec<f32>, SimiaError> {
        let key = cache_key(query);

        {
            let mut cache = self.lock_cache()?;
            if let Some(vector) = cache.get(&key) {
                debug!(key = %key, "query embedding cache hit");
                return Ok(vector);
            }
        }
        debug!(key = %key, "query embedding cache miss");

        let vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(err @ SimiaError::RetrievalUnavailable { .. }) => return Err(err),
            Err(err) => {
                return Err(SimiaError::RetrievalUnavailable {
                    message: format!("query embedding failed: {err}"),
                    source: Some(Box::new(err)),
                });
            }
        };

        self.lock_cache()?.insert(key, vector.clone());
        Ok(vector)
    }

    /// Rank all papers against the query and return the top results.
    ///
    /// Embedding ids with no matching paper record still consume a
    /// result slot; an empty paper index short-circuits to no results
    /// without an embedding call.
    pub async fn search_papers(&self, query: &str) -> Result<Vec<RankedPaper>, SimiaError> {
        if self.store.paper_embeddings().is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.query_embedding(query).await?;

        let mut ranked: Vec<(&str, f32)> = self
            .store
            .paper_embeddings()
            .iter()
            .map(|pe| {
                (
                    pe.id.as_str(),
                    cosine_similarity(&query_vector, &pe.embedding),
                )
            })
            .collect();
        sort_by_score_desc(&mut ranked, |entry| entry.1);

        let mut results = Vec::new();
        for (paper_id, score) in ranked.into_iter().take(self.params.paper_top_k) {
            if let Some(paper) = self.store.paper(paper_id) {
                results.push(RankedPaper {
                    paper: paper.clone(),
                    score,
                });
            }
        }
        Ok(results)
    }

    /// Rank all chunks against the query, keeping at most
    /// `max_per_paper` chunks from any one paper.
    ///
    /// Papers already at their cap are skipped before the chunk record
    /// lookup; the per-paper count only grows when a chunk record is
    /// actually found.
    pub async fn search_chunks(&self, query: &str) -> Result<Vec<RankedChunk>, SimiaError> {
        if self.store.chunk_embeddings().is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.query_embedding(query).await?;

        let mut ranked: Vec<(&str, &str, f32)> = self
            .store
            .chunk_embeddings()
            .iter()
            .map(|ce| {
                (
                    ce.chunk_id.as_str(),
                    ce.paper_id.as_str(),
                    cosine_similarity(&query_vector, &ce.embedding),
                )
            })
            .collect();
        sort_by_score_desc(&mut ranked, |entry| entry.2);

        let mut results = Vec::new();
        let mut per_paper: HashMap<&str, usize> = HashMap::new();
        for (chunk_id, paper_id, score) in ranked {
            let accepted = per_paper.entry(paper_id).or_insert(0);
            if *accepted >= self.params.max_per_paper {
                continue;
            }
            if let Some(chunk) = self.store.chunk(chunk_id) {
                results.push(RankedChunk {
                    chunk: chunk.clone(),
                    score,
                });
                *accepted += 1;
            }
            if results.len() >= self.params.chunk_top_k {
                break;
            }
        }
        Ok(results)
    }

    fn lock_cache(&self) -> Result<std::sync::MutexGuard<'_, EmbeddingCache>, SimiaError> {
        self.cache
            .lock()
            .map_err(|e| SimiaError::Internal(format!("embedding cache lock poisoned: {e}")))
    }
}

/// Cosine similarity between two vectors; 0 when either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Stable descending sort, so equal scores keep corpus order.
fn sort_by_score_desc<T>(entries: &mut [T], score: impl Fn(&T) -> f32) {
    entries.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(Ordering::Equal)
    });
}
