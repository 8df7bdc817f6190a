// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for Gemini streaming responses.
//!
//! Gemini's `alt=sse` protocol sends unnamed data events, each carrying
//! one complete `GenerateContentResponse` JSON object. The
//! `eventsource-stream` crate handles SSE framing.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};

use simia_core::SimiaError;

use crate::types::GenerateResponse;

/// Parses a reqwest streaming response into a stream of response chunks.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<GenerateResponse, SimiaError>> + Send>> {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.map(|result| match result {
        Ok(event) => {
            serde_json::from_str::<GenerateResponse>(&event.data).map_err(|e| {
                SimiaError::Generation {
                    message: format!("failed to parse stream chunk: {e}"),
                    source: Some(Box::new(e)),
                }
            })
        }
        Err(e) => Err(SimiaError::Generation {
            message: format!("SSE stream error: {e}"),
            source: None,
        }),
    });

    Box::pin(mapped)
}
