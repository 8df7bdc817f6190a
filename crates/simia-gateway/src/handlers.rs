// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the chat, health, and paper-listing endpoints.
//!
//! The chat endpoints share one pipeline: admit the request through the
//! gate, record it, classify the question, retrieve context, then hand
//! off to the responder. Chunk-level search is used whenever a chunk
//! index is loaded, except for meta-questions, which always rank whole
//! papers and get the dataset statistics prepended to their context.

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use simia_core::error::DenialReason;
use simia_core::types::ChatTurn;
use simia_core::SimiaError;
use simia_corpus::Paper;
use simia_retrieval::{
    format_chunk_context, format_paper_context, is_meta_question, RankedChunk, RankedPaper,
};

use crate::server::AppState;
use crate::sse;

/// Request body for `POST /chat` and `POST /chat/stream`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    pub question: String,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>,
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The generated (or fallback) answer.
    pub answer: String,
    /// Papers the answer draws on, best match first.
    pub sources: Vec<SourceEntry>,
    /// Requests the client has left in its tightest rate window.
    pub remaining_requests: usize,
}

/// One cited paper in a chat response.
#[derive(Debug, Clone, Serialize)]
pub struct SourceEntry {
    pub title: Option<String>,
    pub year: Option<u16>,
    pub authors: Option<String>,
    pub url: Option<String>,
    /// Similarity score rounded to three decimals.
    pub relevance: f64,
}

/// One cited paper sent ahead of a streamed answer.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSource {
    pub title: Option<String>,
    pub year: Option<u16>,
    pub url: Option<String>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub papers_loaded: usize,
    pub embeddings_loaded: usize,
}

/// Response body for `GET /papers`.
#[derive(Debug, Serialize)]
pub struct PaperListResponse {
    pub count: usize,
    pub papers: Vec<PaperSummary>,
}

/// One row of the paper listing.
#[derive(Debug, Serialize)]
pub struct PaperSummary {
    pub id: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub year: Option<u16>,
    pub topics: Option<String>,
    pub has_abstract: bool,
}

/// Error body carried on every rejected request.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Retrieval output shared by both chat endpoints. Which variant was
/// produced decides how source entries are shaped.
enum Retrieved {
    Chunks(Vec<RankedChunk>),
    Papers(Vec<RankedPaper>),
}

/// `POST /chat`: answer a question in one response.
pub async fn post_chat(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Response {
    let (client_ip, remaining) = match gate_request(&state, &headers, peer) {
        Ok(admitted) => admitted,
        Err(err) => return gate_error_response(err, false),
    };

    let request_id = Uuid::new_v4();
    let meta_question = is_meta_question(&body.question);
    info!(%request_id, client_ip, meta_question, "chat request");

    let history = body.history.unwrap_or_default();

    let (mut context, retrieved) = match retrieve(&state, &body.question, meta_question).await {
        Ok(output) => output,
        Err(err) => return retrieval_error_response(err),
    };
    if meta_question {
        context = wrap_meta_context(&state.stats.render(), &context);
    }

    let sources = chat_sources(&retrieved);
    let answer = state
        .responder
        .answer(&body.question, &context, &history, meta_question)
        .await;

    Json(ChatResponse {
        answer,
        sources,
        remaining_requests: remaining.saturating_sub(1),
    })
    .into_response()
}

/// `POST /chat/stream`: answer a question over Server-Sent Events.
pub async fn post_chat_stream(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Response {
    let (client_ip, _remaining) = match gate_request(&state, &headers, peer) {
        Ok(admitted) => admitted,
        Err(err) => return gate_error_response(err, true),
    };

    let request_id = Uuid::new_v4();
    let meta_question = is_meta_question(&body.question);
    info!(%request_id, client_ip, meta_question, "chat stream request");

    let history = body.history.unwrap_or_default();

    let (mut context, retrieved) = match retrieve(&state, &body.question, meta_question).await {
        Ok(output) => output,
        Err(err) => return retrieval_error_response(err),
    };
    if meta_question {
        context = wrap_meta_context(&state.stats.render(), &context);
    }

    let sources = stream_sources(&retrieved);
    let answers = state
        .responder
        .answer_stream(&body.question, &context, &history, meta_question)
        .await;

    sse::answer_sse_response(sources, answers)
}

/// `GET /health`: liveness plus corpus load counts.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.engine.store();
    Json(HealthResponse {
        status: "healthy".to_string(),
        papers_loaded: store.paper_count(),
        embeddings_loaded: store.paper_embedding_count(),
    })
}

/// `GET /papers`: the full paper listing. Not gated.
pub async fn get_papers(State(state): State<AppState>) -> Json<PaperListResponse> {
    let papers: Vec<PaperSummary> = state
        .engine
        .store()
        .papers()
        .iter()
        .map(paper_summary)
        .collect();
    Json(PaperListResponse {
        count: papers.len(),
        papers,
    })
}

/// Admits the request through the gate and records it on success.
/// Returns the client IP and the pre-request remaining quota.
fn gate_request(
    state: &AppState,
    headers: &HeaderMap,
    peer: SocketAddr,
) -> Result<(String, usize), SimiaError> {
    let ip = client_ip(headers, peer);
    let now = chrono::Utc::now().timestamp();
    let admission = state.gate.admit(
        header_str(headers, "origin"),
        header_str(headers, "referer"),
        &ip,
        now,
    )?;
    state.gate.record(&ip, now)?;
    Ok((ip, admission.remaining))
}

/// Client IP precedence: first `X-Forwarded-For` entry, else the socket
/// peer address.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for")
        && let Some(first) = forwarded.split(',').next()
    {
        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }
    peer.ip().to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Runs chunk-level search when an index is loaded, paper-level search
/// otherwise. Meta-questions always rank whole papers.
async fn retrieve(
    state: &AppState,
    question: &str,
    meta_question: bool,
) -> Result<(String, Retrieved), SimiaError> {
    if state.engine.has_chunk_index() && !meta_question {
        let chunks = state.engine.search_chunks(question).await?;
        let context = format_chunk_context(&chunks);
        Ok((context, Retrieved::Chunks(chunks)))
    } else {
        let papers = state.engine.search_papers(question).await?;
        let context = format_paper_context(&papers);
        Ok((context, Retrieved::Papers(papers)))
    }
}

fn wrap_meta_context(stats: &str, context: &str) -> String {
    format!("{stats}\n\n=== SAMPLE RELEVANT PAPERS ===\n\n{context}")
}

/// Source entries for the non-streaming response. Chunk results are
/// deduplicated by paper, keeping the best-ranked chunk's score.
fn chat_sources(retrieved: &Retrieved) -> Vec<SourceEntry> {
    match retrieved {
        Retrieved::Chunks(chunks) => {
            let mut seen = HashSet::new();
            let mut sources = Vec::new();
            for ranked in chunks {
                if !seen.insert(ranked.chunk.paper_id.as_str()) {
                    continue;
                }
                let meta = &ranked.chunk.metadata;
                sources.push(SourceEntry {
                    title: meta.title.clone(),
                    year: meta.year,
                    authors: meta.authors.clone(),
                    url: meta.url.clone(),
                    relevance: round3(ranked.score),
                });
            }
            sources
        }
        Retrieved::Papers(papers) => papers
            .iter()
            .map(|ranked| SourceEntry {
                title: ranked
                    .paper
                    .title
                    .clone()
                    .or_else(|| ranked.paper.name.clone()),
                year: ranked.paper.year,
                authors: ranked.paper.authors.clone(),
                url: ranked.paper.url.clone(),
                relevance: round3(ranked.score),
            })
            .collect(),
    }
}

/// Source entries announced ahead of a streamed answer, capped at three.
fn stream_sources(retrieved: &Retrieved) -> Vec<StreamSource> {
    let mut sources: Vec<StreamSource> = match retrieved {
        Retrieved::Chunks(chunks) => {
            let mut seen = HashSet::new();
            let mut sources = Vec::new();
            for ranked in chunks {
                if !seen.insert(ranked.chunk.paper_id.as_str()) {
                    continue;
                }
                let meta = &ranked.chunk.metadata;
                sources.push(StreamSource {
                    title: meta.title.clone(),
                    year: meta.year,
                    url: meta.url.clone(),
                });
            }
            sources
        }
        Retrieved::Papers(papers) => papers
            .iter()
            .map(|ranked| StreamSource {
                title: ranked.paper.title.clone(),
                year: ranked.paper.year,
                url: ranked.paper.url.clone(),
            })
            .collect(),
    };
    sources.truncate(3);
    sources
}

fn paper_summary(paper: &Paper) -> PaperSummary {
    PaperSummary {
        id: paper.id.clone(),
        name: paper.name.clone(),
        title: paper.title.clone(),
        year: paper.year,
        topics: paper.topics.clone(),
        has_abstract: paper.has_abstract(),
    }
}

/// Similarity scores are presented with three decimals.
fn round3(score: f32) -> f64 {
    (f64::from(score) * 1000.0).round() / 1000.0
}

fn denial_status(reason: DenialReason) -> StatusCode {
    match reason {
        DenialReason::UnauthorizedOrigin => StatusCode::FORBIDDEN,
        DenialReason::HourlyLimit | DenialReason::DailyLimit => StatusCode::TOO_MANY_REQUESTS,
        DenialReason::GlobalLimit => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// The streaming endpoint keeps its denial messages short.
fn stream_denial_message(reason: DenialReason) -> &'static str {
    match reason {
        DenialReason::UnauthorizedOrigin => "Unauthorized origin.",
        DenialReason::HourlyLimit | DenialReason::DailyLimit => "Rate limit exceeded.",
        DenialReason::GlobalLimit => "Daily limit reached.",
    }
}

fn gate_error_response(err: SimiaError, stream: bool) -> Response {
    match err {
        SimiaError::GateDenied { reason, message } => {
            let detail = if stream {
                stream_denial_message(reason).to_string()
            } else {
                message
            };
            error_response(denial_status(reason), detail)
        }
        other => {
            warn!(error = %other, "gate check failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn retrieval_error_response(err: SimiaError) -> Response {
    warn!(error = %err, "retrieval failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to generate query embedding",
    )
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDetail {
            detail: detail.into(),
        }),
    )
        .into_response()
}
