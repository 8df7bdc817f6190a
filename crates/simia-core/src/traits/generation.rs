// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation collaborator trait.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::SimiaError;
use crate::types::{GenerationChunk, GenerationRequest, GenerationResponse};

/// Opaque text-completion collaborator.
///
/// Implementations wrap a remote model API; the serving layer treats them
/// as a prompt-in, text-out function with an optional streaming variant
/// and degrades to a deterministic local fallback when they fail.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, SimiaError>;

    /// Sends a completion request and returns a stream of response fragments.
    async fn stream(
        &self,
        request: GenerationRequest,
    ) -> Result<
        Pin<Box<dyn Stream<Item = Result<GenerationChunk, SimiaError>> + Send>>,
        SimiaError,
    >;
}
