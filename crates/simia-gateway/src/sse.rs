// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events assembly for the streaming chat endpoint.
//!
//! The wire order is fixed: one event carrying the source list, then
//! text fragments, then either a done marker or a single error event.
//! Every event is a bare JSON object in the `data` field.

use std::convert::Infallible;

use axum::http::HeaderValue;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, StreamExt};

use simia_responder::{AnswerEvent, AnswerStream};

use crate::handlers::StreamSource;

/// Builds the streaming response: a sources event followed by the
/// answer events, with proxy buffering disabled.
pub fn answer_sse_response(sources: Vec<StreamSource>, answers: AnswerStream) -> Response {
    let first = stream::once(async move {
        let data = serde_json::json!({ "sources": sources }).to_string();
        Ok::<Event, Infallible>(Event::default().data(data))
    });
    let rest = answers.map(|event| Ok::<Event, Infallible>(Event::default().data(event_data(&event))));

    let mut response = Sse::new(first.chain(rest)).into_response();
    let headers = response.headers_mut();
    headers.insert("cache-control", HeaderValue::from_static("no-cache"));
    headers.insert("connection", HeaderValue::from_static("keep-alive"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    response
}

fn event_data(event: &AnswerEvent) -> String {
    match event {
        AnswerEvent::Text(text) => serde_json::json!({ "text": text }).to_string(),
        AnswerEvent::Done => serde_json::json!({ "done": true }).to_string(),
        AnswerEvent::Error(message) => serde_json::json!({ "error": message }).to_string(),
    }
}
