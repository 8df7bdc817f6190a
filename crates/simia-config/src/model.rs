// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Simia backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup rather than silently ignoring typos.

use serde::{Deserialize, Serialize};

/// Top-level Simia configuration.
///
/// Loaded from TOML files with environment variable overrides. All
/// sections are optional and default to the values the public deployment
/// runs with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SimiaConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Corpus data file locations.
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Origin allow-list and request quotas.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Vector search and embedding-cache tuning.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Gemini generation collaborator settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Embedding collaborator settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Corpus data file configuration.
///
/// The four corpus files produced by the offline pipeline are looked up
/// inside `data_dir` under fixed names; missing files degrade capability
/// at startup instead of failing it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Directory holding the corpus JSON files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Origin allow-list and request quota configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Site origins allowed to call the chat endpoints (prefix match
    /// against Origin, then Referer).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Requests per rolling hour per client IP.
    #[serde(default = "default_hourly_limit")]
    pub hourly_limit: usize,

    /// Requests per rolling 24 hours per client IP.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,

    /// Total requests per rolling 24 hours across all clients.
    #[serde(default = "default_global_daily_limit")]
    pub global_daily_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            hourly_limit: default_hourly_limit(),
            daily_limit: default_daily_limit(),
            global_daily_limit: default_global_daily_limit(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://kordinglab.com".to_string(),
        "https://www.kordinglab.com".to_string(),
        "https://kordinglab.github.io".to_string(),
        "http://localhost:8000".to_string(),
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:8000".to_string(),
    ]
}

fn default_hourly_limit() -> usize {
    20
}

fn default_daily_limit() -> usize {
    100
}

fn default_global_daily_limit() -> usize {
    500
}

/// Vector search and embedding-cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Papers returned by paper-level search.
    #[serde(default = "default_paper_top_k")]
    pub paper_top_k: usize,

    /// Chunks returned by chunk-level search.
    #[serde(default = "default_chunk_top_k")]
    pub chunk_top_k: usize,

    /// Maximum chunks a single paper may contribute to one result set.
    #[serde(default = "default_max_per_paper")]
    pub max_per_paper: usize,

    /// Capacity of the LRU query-embedding cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            paper_top_k: default_paper_top_k(),
            chunk_top_k: default_chunk_top_k(),
            max_per_paper: default_max_per_paper(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_paper_top_k() -> usize {
    5
}

fn default_chunk_top_k() -> usize {
    6
}

fn default_max_per_paper() -> usize {
    2
}

fn default_cache_capacity() -> usize {
    100
}

/// Gemini generation collaborator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` disables the collaborator and the responder
    /// runs in local-fallback mode.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier for generation requests.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_gemini_timeout_secs() -> u64 {
    60
}

/// Embedding collaborator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding service.
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Embedding model name passed to the service.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected vector dimension; responses of any other length are
    /// rejected because they cannot be compared against the corpus.
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

fn default_embedding_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

fn default_embedding_dimension() -> usize {
    simia_core::EMBEDDING_DIM
}

fn default_embedding_timeout_secs() -> u64 {
    30
}
