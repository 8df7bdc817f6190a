// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `simia serve` command implementation.
//!
//! Loads the corpus from disk, wires the retrieval engine, the Gemini
//! generation provider, the Ollama embedding provider, and the access
//! gate, then starts the HTTP server. A missing Gemini API key is not
//! fatal; the responder then serves local fallback answers.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use simia_config::SimiaConfig;
use simia_core::{EmbeddingProvider, GenerationProvider, SimiaError};
use simia_corpus::{load_corpus, DatasetStats};
use simia_embed::OllamaEmbedder;
use simia_gateway::{AccessGate, AppState, GateLimits, ServerConfig};
use simia_gemini::GeminiProvider;
use simia_responder::Responder;
use simia_retrieval::{RetrievalEngine, RetrievalParams};

/// Runs the `simia serve` command.
pub async fn run_serve(config: SimiaConfig) -> Result<(), SimiaError> {
    init_tracing(&config.server.log_level);

    info!("starting simia serve");

    let store = Arc::new(load_corpus(Path::new(&config.corpus.data_dir))?);
    let stats = Arc::new(DatasetStats::compute(store.papers()));
    info!(
        papers = store.paper_count(),
        paper_embeddings = store.paper_embedding_count(),
        chunk_index = store.has_chunk_index(),
        "corpus loaded"
    );

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(&config.embedding)?);

    let engine = Arc::new(RetrievalEngine::new(
        store,
        embedder,
        RetrievalParams {
            paper_top_k: config.retrieval.paper_top_k,
            chunk_top_k: config.retrieval.chunk_top_k,
            max_per_paper: config.retrieval.max_per_paper,
            cache_capacity: config.retrieval.cache_capacity,
        },
    ));

    let responder = Arc::new(Responder::new(
        build_generation_provider(&config),
        config.gemini.max_output_tokens,
    ));

    let gate = Arc::new(AccessGate::new(GateLimits {
        allowed_origins: config.limits.allowed_origins.clone(),
        hourly_limit: config.limits.hourly_limit,
        daily_limit: config.limits.daily_limit,
        global_daily_limit: config.limits.global_daily_limit,
    }));

    let state = AppState {
        engine,
        stats,
        responder,
        gate,
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        allowed_origins: config.limits.allowed_origins.clone(),
    };

    simia_gateway::start_server(&server_config, state).await
}

/// The server runs without a generation provider when no API key can be
/// resolved; answers then come from the responder's local fallback.
fn build_generation_provider(config: &SimiaConfig) -> Option<Arc<dyn GenerationProvider>> {
    match GeminiProvider::new(&config.gemini) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(err) => {
            warn!(error = %err, "generation provider unavailable, serving local fallback answers");
            None
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
