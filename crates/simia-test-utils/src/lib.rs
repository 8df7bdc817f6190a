// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Simia integration tests.
//!
//! Provides mock collaborators for fast, deterministic, CI-runnable
//! tests without external services.
//!
//! # Components
//!
//! - [`MockGeneration`] - Scripted generation collaborator with request capture
//! - [`MockEmbedding`] - Fixed-vector embedding collaborator with a call counter

pub mod mock_embedding;
pub mod mock_generation;

pub use mock_embedding::MockEmbedding;
pub use mock_generation::{MockGeneration, MockScript};
