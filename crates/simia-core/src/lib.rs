// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Simia paper-chat backend.
//!
//! This crate provides the error taxonomy, shared request/response types,
//! and the collaborator traits implemented by the Gemini and embedding
//! clients (and by scripted mocks in tests).

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{DenialReason, SimiaError};
pub use traits::{EmbeddingProvider, GenerationProvider};
pub use types::{
    ChatRole, ChatTurn, EMBEDDING_DIM, GenerationChunk, GenerationRequest, GenerationResponse,
    TokenUsage,
};
