// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The generation and embedding models are external services. These traits
//! use `#[async_trait]` for dynamic dispatch so the serving layer can hold
//! them as trait objects and tests can substitute scripted mocks.

pub mod embedding;
pub mod generation;

pub use embedding::EmbeddingProvider;
pub use generation::GenerationProvider;
