// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Simia pipeline.
//!
//! Each test writes corpus files into a temp directory, loads them the
//! way `simia serve` does, and drives the assembled router with mocked
//! embedding and generation collaborators.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use simia_config::SimiaConfig;
use simia_core::{EmbeddingProvider, GenerationProvider};
use simia_corpus::{load_corpus, DatasetStats};
use simia_gateway::{build_router, AccessGate, AppState, GateLimits};
use simia_responder::Responder;
use simia_retrieval::{RetrievalEngine, RetrievalParams};
use simia_test_utils::{MockEmbedding, MockGeneration};

const ORIGIN: &str = "https://kordinglab.com";

fn write_paper_files(dir: &Path) {
    let papers = serde_json::json!([
        {
            "id": "face_rec",
            "name": "face-rec-repo",
            "title": "Face Recognition in Macaques",
            "year": 2021,
            "authors": "A. Researcher",
            "topics": "face recognition",
            "animal": "macaque",
            "abstract": "We study how macaques recognize faces.",
            "url": "https://papers.test/face_rec"
        },
        {
            "id": "pose_est",
            "title": "Pose Estimation for Primates",
            "year": 2022,
            "authors": "B. Researcher",
            "topics": "pose estimation",
            "animal": "chimpanzee",
            "abstract": "We track primate posture from video.",
            "url": "https://papers.test/pose_est"
        }
    ]);
    std::fs::write(dir.join("papers_with_abstracts.json"), papers.to_string()).unwrap();

    let embeddings = serde_json::json!({
        "model": "all-minilm",
        "dimension": 3,
        "papers": [
            {"id": "face_rec", "embedding": [1.0, 0.0, 0.0]},
            {"id": "pose_est", "embedding": [0.0, 1.0, 0.0]}
        ]
    });
    std::fs::write(dir.join("embeddings.json"), embeddings.to_string()).unwrap();
}

fn write_chunk_files(dir: &Path) {
    let chunks = serde_json::json!({
        "total_chunks": 2,
        "total_papers": 2,
        "chunks": [
            {
                "chunk_id": "face_rec_0",
                "paper_id": "face_rec",
                "section": "methods",
                "text": "We trained a face identification model on macaque portraits.",
                "char_count": 60,
                "metadata": {
                    "title": "Face Recognition in Macaques",
                    "year": 2021,
                    "authors": "A. Researcher",
                    "animal": "macaque",
                    "topics": "face recognition",
                    "url": "https://papers.test/face_rec"
                }
            },
            {
                "chunk_id": "pose_est_0",
                "paper_id": "pose_est",
                "section": "results",
                "text": "Pose tracking reached strong accuracy on chimpanzees.",
                "metadata": {
                    "title": "Pose Estimation for Primates",
                    "year": 2022
                }
            }
        ]
    });
    std::fs::write(dir.join("chunks.json"), chunks.to_string()).unwrap();

    let chunk_embeddings = serde_json::json!({
        "model": "all-minilm",
        "dimension": 3,
        "total_embeddings": 2,
        "embeddings": [
            {"chunk_id": "face_rec_0", "paper_id": "face_rec", "embedding": [1.0, 0.0, 0.0]},
            {"chunk_id": "pose_est_0", "paper_id": "pose_est", "embedding": [0.0, 1.0, 0.0]}
        ]
    });
    std::fs::write(dir.join("chunk_embeddings.json"), chunk_embeddings.to_string()).unwrap();
}

/// Assembles the router the way `simia serve` does, with mocked
/// embedding and generation collaborators.
fn pipeline(data_dir: &Path, config: &SimiaConfig, provider: Option<Arc<MockGeneration>>) -> Router {
    let store = Arc::new(load_corpus(data_dir).expect("corpus should load"));
    let stats = Arc::new(DatasetStats::compute(store.papers()));
    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(MockEmbedding::returning(vec![1.0, 0.0, 0.0]));
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
    let generation = provider.map(|p| p as Arc<dyn GenerationProvider>);
    let responder = Arc::new(Responder::new(generation, config.gemini.max_output_tokens));
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
    let peer = SocketAddr::from(([127, 0, 0, 1], 41500));
    build_router(state, &config.limits.allowed_origins).layer(MockConnectInfo(peer))
}

fn default_config() -> SimiaConfig {
    simia_config::load_and_validate_str("").expect("defaults are valid")
}

fn chat_request(uri: &str, question: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("origin", ORIGIN)
        .body(Body::from(
            serde_json::json!({ "question": question }).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---- Test 1: disk corpus feeds the health endpoint ----

#[tokio::test]
async fn health_reflects_the_loaded_corpus() {
    let dir = tempfile::tempdir().unwrap();
    write_paper_files(dir.path());

    let app = pipeline(dir.path(), &default_config(), None);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["papers_loaded"], 2);
    assert_eq!(json["embeddings_loaded"], 2);
}

// ---- Test 2: question-to-answer pipeline ----

#[tokio::test]
async fn chat_answers_from_the_disk_corpus() {
    let dir = tempfile::tempdir().unwrap();
    write_paper_files(dir.path());

    let mock = Arc::new(MockGeneration::with_replies(vec![
        "Macaques use holistic face processing.".to_string(),
    ]));
    let app = pipeline(dir.path(), &default_config(), Some(Arc::clone(&mock)));

    let response = app
        .oneshot(chat_request("/chat", "how do macaques recognize faces?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["answer"], "Macaques use holistic face processing.");
    assert_eq!(json["remaining_requests"], 19);

    let sources = json["sources"].as_array().unwrap();
    assert_eq!(sources[0]["title"], "Face Recognition in Macaques");
    assert_eq!(sources[0]["year"], 2021);
    assert_eq!(sources[0]["relevance"], 1.0);

    // The abstract from disk reached the generation request.
    let requests = mock.requests().await;
    let user_turn = requests[0].messages.last().unwrap();
    assert!(user_turn
        .content
        .contains("We study how macaques recognize faces."));
}

// ---- Test 3: chunk files enable section-level search ----

#[tokio::test]
async fn chunk_files_enable_section_search() {
    let dir = tempfile::tempdir().unwrap();
    write_paper_files(dir.path());
    write_chunk_files(dir.path());

    let mock = Arc::new(MockGeneration::with_replies(vec!["Answer.".to_string()]));
    let app = pipeline(dir.path(), &default_config(), Some(Arc::clone(&mock)));

    let response = app
        .oneshot(chat_request("/chat", "face identification methods"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = mock.requests().await;
    let user_turn = requests[0].messages.last().unwrap();
    assert!(user_turn.content.contains("[METHODS]"));
    assert!(user_turn
        .content
        .contains("We trained a face identification model on macaque portraits."));
}

// ---- Test 4: missing corpus files degrade, not fail ----

#[tokio::test]
async fn missing_corpus_files_degrade_gracefully() {
    let dir = tempfile::tempdir().unwrap();

    let app = pipeline(dir.path(), &default_config(), None);

    let health = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(health).await;
    assert_eq!(json["papers_loaded"], 0);
    assert_eq!(json["embeddings_loaded"], 0);

    let chat = app
        .oneshot(chat_request("/chat", "anything at all"))
        .await
        .unwrap();
    assert_eq!(chat.status(), StatusCode::OK);
    let json = body_json(chat).await;
    let answer = json["answer"].as_str().unwrap();
    assert!(answer.starts_with("I don't have papers about that in my database."));
    assert!(json["sources"].as_array().unwrap().is_empty());
}

// ---- Test 5: configuration drives limits and retrieval ----

#[tokio::test]
async fn config_values_flow_into_gate_and_retrieval() {
    let dir = tempfile::tempdir().unwrap();
    write_paper_files(dir.path());

    let config = simia_config::load_and_validate_str(
        r#"
        [limits]
        hourly_limit = 1

        [retrieval]
        paper_top_k = 1
        "#,
    )
    .unwrap();

    let app = pipeline(dir.path(), &config, Some(Arc::new(MockGeneration::new())));

    let first = app
        .clone()
        .oneshot(chat_request("/chat", "faces"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["sources"].as_array().unwrap().len(), 1);
    assert_eq!(json["remaining_requests"], 0);

    let second = app.oneshot(chat_request("/chat", "faces")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ---- Test 6: streaming pipeline ----

#[tokio::test]
async fn stream_delivers_sources_then_answer() {
    let dir = tempfile::tempdir().unwrap();
    write_paper_files(dir.path());
    write_chunk_files(dir.path());

    let mock = Arc::new(MockGeneration::with_replies(vec![
        "Streamed answer.".to_string(),
    ]));
    let app = pipeline(dir.path(), &default_config(), Some(mock));

    let response = app
        .oneshot(chat_request("/chat/stream", "face identification methods"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");

    let body = body_text(response).await;
    let events: Vec<&str> = body
        .split("\n\n")
        .filter(|chunk| !chunk.is_empty())
        .collect();
    assert_eq!(events.len(), 3);

    let sources: serde_json::Value =
        serde_json::from_str(events[0].trim_start_matches("data: ")).unwrap();
    let listed = sources["sources"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["title"], "Face Recognition in Macaques");
    assert!(listed[1]["url"].is_null());

    assert_eq!(events[1], r#"data: {"text":"Streamed answer."}"#);
    assert_eq!(events[2], r#"data: {"done":true}"#);
}
