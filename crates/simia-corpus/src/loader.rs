// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup loading of the corpus JSON files.
//!
//! A missing file degrades capability (logged as a warning) rather than
//! failing startup; a file that is present but unreadable or malformed is
//! an error, as is a paper or chunk record without an id.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use simia_core::SimiaError;

use crate::records::{ChunkEmbeddingsFile, ChunksFile, Paper, PaperEmbeddingsFile};
use crate::store::CorpusStore;

pub const PAPERS_FILE: &str = "papers_with_abstracts.json";
pub const EMBEDDINGS_FILE: &str = "embeddings.json";
pub const CHUNKS_FILE: &str = "chunks.json";
pub const CHUNK_EMBEDDINGS_FILE: &str = "chunk_embeddings.json";

/// Load the corpus from `data_dir`, degrading per missing file.
pub fn load_corpus(data_dir: &Path) -> Result<CorpusStore, SimiaError> {
    let papers: Vec<Paper> = match read_json(&data_dir.join(PAPERS_FILE))? {
        Some(papers) => papers,
        None => {
            warn!(path = %data_dir.join(PAPERS_FILE).display(), "papers file not found");
            Vec::new()
        }
    };
    validate_paper_ids(&papers)?;

    let paper_embeddings = match read_json::<PaperEmbeddingsFile>(&data_dir.join(EMBEDDINGS_FILE))?
    {
        Some(file) => file.papers,
        None => {
            warn!(path = %data_dir.join(EMBEDDINGS_FILE).display(), "embeddings file not found");
            Vec::new()
        }
    };

    let chunks = match read_json::<ChunksFile>(&data_dir.join(CHUNKS_FILE))? {
        Some(file) => file.chunks,
        None => Vec::new(),
    };
    validate_chunk_ids(&chunks)?;

    let chunk_embeddings =
        match read_json::<ChunkEmbeddingsFile>(&data_dir.join(CHUNK_EMBEDDINGS_FILE))? {
            Some(file) => file.embeddings,
            None => {
                warn!("chunk embeddings not found, using paper-level search");
                Vec::new()
            }
        };

    let store = CorpusStore::new(papers, paper_embeddings, chunks, chunk_embeddings);
    info!(
        papers = store.paper_count(),
        paper_embeddings = store.paper_embedding_count(),
        chunks = store.chunks().len(),
        chunk_embeddings = store.chunk_embeddings().len(),
        chunk_search = store.has_chunk_index(),
        "corpus loaded"
    );
    Ok(store)
}

/// Read and parse one corpus file. `Ok(None)` means the file is absent.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SimiaError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| SimiaError::Corpus {
        message: format!("failed to read {}", path.display()),
        source: Some(Box::new(e)),
    })?;
    let parsed = serde_json::from_str(&content).map_err(|e| SimiaError::Corpus {
        message: format!("failed to parse {}", path.display()),
        source: Some(Box::new(e)),
    })?;
    Ok(Some(parsed))
}

fn validate_paper_ids(papers: &[Paper]) -> Result<(), SimiaError> {
    for (idx, paper) in papers.iter().enumerate() {
        if paper.id.trim().is_empty() {
            return Err(SimiaError::Corpus {
                message: format!("{PAPERS_FILE}: paper at index {idx} has an empty id"),
                source: None,
            });
        }
    }
    Ok(())
}

fn validate_chunk_ids(chunks: &[crate::records::Chunk]) -> Result<(), SimiaError> {
    for (idx, chunk) in chunks.iter().enumerate() {
        if chunk.chunk_id.trim().is_empty() || chunk.paper_id.trim().is_empty() {
            return Err(SimiaError::Corpus {
                message: format!("{CHUNKS_FILE}: chunk at index {idx} has an empty id"),
                source: None,
            });
        }
    }
    Ok(())
}
