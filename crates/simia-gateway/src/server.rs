// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server assembly for the Simia gateway.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use simia_core::SimiaError;
use simia_corpus::DatasetStats;
use simia_responder::Responder;
use simia_retrieval::RetrievalEngine;

use crate::gate::AccessGate;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Vector search over the loaded corpus.
    pub engine: Arc<RetrievalEngine>,
    /// Dataset statistics computed at startup, rendered into the
    /// context for meta-questions.
    pub stats: Arc<DatasetStats>,
    /// Answer generation with a local fallback when no provider is
    /// configured.
    pub responder: Arc<Responder>,
    /// Origin allow-list and rolling rate limits.
    pub gate: Arc<AccessGate>,
}

/// Server configuration (mirrors `ServerConfig` and the origin list
/// from simia-config to avoid a dependency on the config crate).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0".
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Origins allowed by both the CORS layer and the access gate.
    pub allowed_origins: Vec<String>,
}

/// Builds the application router with CORS and request tracing.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/chat", post(handlers::post_chat))
        .route("/chat/stream", post(handlers::post_chat_stream))
        .route("/health", get(handlers::get_health))
        .route("/papers", get(handlers::get_papers))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// CORS for the browser frontend. Credentialed requests rule out
/// wildcard headers, so the header list is explicit.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
}

/// Starts the HTTP server and serves requests until the process exits.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), SimiaError> {
    let app = build_router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SimiaError::Internal(format!("failed to bind server to {addr}: {e}")))?;

    tracing::info!("Simia server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| SimiaError::Internal(format!("server error: {e}")))?;

    Ok(())
}
